// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plugin discovery sources.
//!
//! A [`PluginSource`] hands the registry an already-materialized list of
//! candidate instances. How the candidates are found is up to the source:
//! - [`StaticSource`] - an explicit table built in code
//! - [`BuiltinSource`] - every plugin shipped with this crate
//! - [`ConfigSource`] - built-ins selected by a [`RegistryConfig`]
//! - [`ChainSource`] - several sources, in order

use std::fmt;
use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::core::Result;
use crate::plugin::builtin;
use crate::plugin::{Processor, Serializer};

/// Supplies candidate plugins to [`PluginRegistry::discover`].
///
/// [`PluginRegistry::discover`]: super::PluginRegistry::discover
pub trait PluginSource: Send + Sync {
    /// Candidate serializers.
    fn serializers(&self) -> Vec<Arc<dyn Serializer>>;

    /// Candidate processors.
    fn processors(&self) -> Vec<Arc<dyn Processor>>;

    /// Short label used in log output.
    fn describe(&self) -> &str {
        "custom"
    }
}

/// Explicit table of plugin instances.
///
/// # Example
///
/// ```
/// use transcodec::plugin::builtin::{JsonSerializer, ZstdProcessor};
/// use transcodec::registry::{PluginRegistry, StaticSource};
///
/// let source = StaticSource::new()
///     .with_serializer(JsonSerializer)
///     .with_processor(ZstdProcessor);
/// let registry = PluginRegistry::from_source(&source)?;
/// assert_eq!(registry.processor_count(), 1);
/// # Ok::<(), transcodec::CodecError>(())
/// ```
#[derive(Clone, Default)]
pub struct StaticSource {
    serializers: Vec<Arc<dyn Serializer>>,
    processors: Vec<Arc<dyn Processor>>,
}

impl fmt::Debug for StaticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSource")
            .field(
                "serializers",
                &self.serializers.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field(
                "processors",
                &self.processors.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl StaticSource {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a serializer.
    pub fn with_serializer<S: Serializer>(mut self, serializer: S) -> Self {
        self.serializers.push(Arc::new(serializer));
        self
    }

    /// Add a processor.
    pub fn with_processor<P: Processor>(mut self, processor: P) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    /// Add a shared serializer instance.
    pub fn push_serializer(&mut self, serializer: Arc<dyn Serializer>) {
        self.serializers.push(serializer);
    }

    /// Add a shared processor instance.
    pub fn push_processor(&mut self, processor: Arc<dyn Processor>) {
        self.processors.push(processor);
    }
}

impl PluginSource for StaticSource {
    fn serializers(&self) -> Vec<Arc<dyn Serializer>> {
        self.serializers.clone()
    }

    fn processors(&self) -> Vec<Arc<dyn Processor>> {
        self.processors.clone()
    }

    fn describe(&self) -> &str {
        "static"
    }
}

/// Every serializer and processor in [`builtin`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl PluginSource for BuiltinSource {
    fn serializers(&self) -> Vec<Arc<dyn Serializer>> {
        builtin::serializers()
    }

    fn processors(&self) -> Vec<Arc<dyn Processor>> {
        builtin::processors()
    }

    fn describe(&self) -> &str {
        "builtin"
    }
}

/// Built-in plugins filtered by a [`RegistryConfig`].
#[derive(Clone)]
pub struct ConfigSource {
    serializers: Vec<Arc<dyn Serializer>>,
    processors: Vec<Arc<dyn Processor>>,
}

impl ConfigSource {
    /// Resolve the plugin names in `config` against the built-ins.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownPlugin`](crate::CodecError::UnknownPlugin) for a
    /// name that is not a built-in.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        Ok(Self {
            serializers: config.enabled_serializers()?,
            processors: config.enabled_processors()?,
        })
    }
}

impl PluginSource for ConfigSource {
    fn serializers(&self) -> Vec<Arc<dyn Serializer>> {
        self.serializers.clone()
    }

    fn processors(&self) -> Vec<Arc<dyn Processor>> {
        self.processors.clone()
    }

    fn describe(&self) -> &str {
        "config"
    }
}

/// Concatenation of several sources, queried in order.
#[derive(Default)]
pub struct ChainSource {
    sources: Vec<Box<dyn PluginSource>>,
}

impl ChainSource {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source.
    pub fn with<S: PluginSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of chained sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl PluginSource for ChainSource {
    fn serializers(&self) -> Vec<Arc<dyn Serializer>> {
        self.sources.iter().flat_map(|s| s.serializers()).collect()
    }

    fn processors(&self) -> Vec<Arc<dyn Processor>> {
        self.sources.iter().flat_map(|s| s.processors()).collect()
    }

    fn describe(&self) -> &str {
        "chain"
    }
}
