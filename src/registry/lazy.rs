// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Registry initialized on first use.

use std::sync::OnceLock;

use super::{PluginRegistry, PluginSource};
use crate::core::Result;

/// A [`PluginRegistry`] whose discovery pass runs exactly once, on the first
/// call to [`get`](LazyRegistry::get), no matter how many threads race for it.
///
/// The outcome is cached: if discovery fails, every later `get` returns the
/// same error instead of retrying.
///
/// # Example
///
/// ```
/// use transcodec::registry::{BuiltinSource, LazyRegistry};
///
/// let plugins = LazyRegistry::new(BuiltinSource);
/// assert!(!plugins.is_initialized());
/// assert_eq!(plugins.get()?.processor_count(), 4);
/// assert!(plugins.is_initialized());
/// # Ok::<(), transcodec::CodecError>(())
/// ```
pub struct LazyRegistry<S> {
    source: S,
    cell: OnceLock<Result<PluginRegistry>>,
}

impl<S: PluginSource> LazyRegistry<S> {
    /// Wrap `source`; nothing is discovered yet.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cell: OnceLock::new(),
        }
    }

    /// The registry, running discovery first if this is the first call.
    pub fn get(&self) -> Result<&PluginRegistry> {
        self.cell
            .get_or_init(|| PluginRegistry::from_source(&self.source))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether discovery has already run.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The source this registry discovers from.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: PluginSource> std::fmt::Debug for LazyRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRegistry")
            .field("source", &self.source.describe())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::io::{self, Read, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::core::{CodecError, Options};
    use crate::plugin::builtin::{self, ZstdProcessor};
    use crate::plugin::{Plugin, Processor, Serializer};
    use crate::registry::StaticSource;

    /// Counts how often discovery is asked for candidates.
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl PluginSource for CountingSource {
        fn serializers(&self) -> Vec<Arc<dyn Serializer>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            builtin::serializers()
        }

        fn processors(&self) -> Vec<Arc<dyn Processor>> {
            builtin::processors()
        }
    }

    #[test]
    fn test_discovery_runs_once_under_contention() {
        let lazy = Arc::new(LazyRegistry::new(CountingSource {
            calls: AtomicUsize::new(0),
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                thread::spawn(move || lazy.get().unwrap().serializer_count())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        assert_eq!(lazy.source().calls.load(Ordering::SeqCst), 1);
    }

    /// Claims zstd's wire identifier under another name.
    struct Clash;

    impl Plugin for Clash {
        fn identifier(&self) -> u8 {
            0x10
        }

        fn name(&self) -> &'static str {
            "clash"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl Processor for Clash {
        fn forward(&self, input: &mut dyn Read, output: &mut dyn Write, _: &Options) -> Result<u64> {
            Ok(io::copy(input, output)?)
        }

        fn reverse(&self, input: &mut dyn Read, output: &mut dyn Write, _: &Options) -> Result<u64> {
            Ok(io::copy(input, output)?)
        }
    }

    #[test]
    fn test_failure_is_cached() {
        let source = StaticSource::new()
            .with_processor(ZstdProcessor)
            .with_processor(Clash);

        let lazy = LazyRegistry::new(source);
        let first = lazy.get().unwrap_err();
        assert!(matches!(first, CodecError::ConflictingRegistration { .. }));
        assert!(lazy.is_initialized());
        let second = lazy.get().unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
    }
}
