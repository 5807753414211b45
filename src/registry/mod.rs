// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plugin registry.
//!
//! The registry keeps, per plugin kind, a catalog keyed by implementation
//! name, by wire identifier and by concrete type. The maps are mutated
//! together under one write lock, so readers never observe a half-inserted
//! entry.
//!
//! Registration rules:
//! - another instance of a type that is already present, under the same
//!   identifier, is a no-op ([`Registration::AlreadyPresent`])
//! - a registered type claiming a new identifier, or a different type
//!   claiming a bound name or identifier, fails with
//!   [`CodecError::ConflictingRegistration`]
//! - identifier `0` fails with [`CodecError::ReservedIdentifier`]
//!
//! # Example
//!
//! ```
//! use transcodec::plugin::builtin::{JsonSerializer, ZstdProcessor};
//! use transcodec::registry::{PluginRegistry, Registration};
//!
//! let registry = PluginRegistry::new();
//! assert_eq!(registry.add_serializer(JsonSerializer)?, Registration::Added);
//! assert_eq!(registry.add_serializer(JsonSerializer)?, Registration::AlreadyPresent);
//! registry.add_processor(ZstdProcessor)?;
//!
//! assert_eq!(registry.processor(0x10).map(|p| p.name()), Some("zstd"));
//! # Ok::<(), transcodec::CodecError>(())
//! ```

pub mod lazy;
pub mod source;

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

pub use lazy::LazyRegistry;
pub use source::{BuiltinSource, ChainSource, ConfigSource, PluginSource, StaticSource};

use crate::codec::{self, CompositeId, DecodedPipeline};
use crate::core::{CodecError, PluginKind, Result, RESERVED_IDENTIFIER};
use crate::plugin::{Plugin, Processor, Serializer};

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The plugin was inserted into the catalog
    Added,
    /// The same implementation was already registered; nothing changed
    AlreadyPresent,
}

/// Summary of one discovery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Serializers inserted by this pass
    pub serializers_added: usize,
    /// Serializer candidates that were already registered
    pub serializers_present: usize,
    /// Processors inserted by this pass
    pub processors_added: usize,
    /// Processor candidates that were already registered
    pub processors_present: usize,
}

impl DiscoveryReport {
    /// Total number of plugins inserted.
    pub fn added(&self) -> usize {
        self.serializers_added + self.processors_added
    }
}

/// Concrete type behind a plugin trait object.
fn type_of<P: Plugin + ?Sized>(plugin: &P) -> TypeId {
    plugin.as_any().type_id()
}

/// Name, identifier and type keyed maps for one plugin kind.
///
/// A concrete type is held at most once; every instance of it is
/// interchangeable with the one already stored.
struct PluginTable<P: ?Sized> {
    kind: PluginKind,
    by_name: HashMap<&'static str, Arc<P>>,
    by_id: HashMap<u8, Arc<P>>,
    by_type: HashMap<TypeId, Arc<P>>,
}

impl<P: Plugin + ?Sized> PluginTable<P> {
    fn new(kind: PluginKind) -> Self {
        Self {
            kind,
            by_name: HashMap::new(),
            by_id: HashMap::new(),
            by_type: HashMap::new(),
        }
    }

    /// Decide what registering `candidate` would do, without mutating.
    fn check(&self, candidate: &P) -> Result<Registration> {
        let id = candidate.identifier();
        let name = candidate.name();
        if id == RESERVED_IDENTIFIER {
            return Err(CodecError::reserved_identifier(self.kind, name));
        }

        if let Some(existing) = self.by_type.get(&type_of(candidate)) {
            if existing.identifier() != id {
                return Err(CodecError::conflicting_registration(
                    self.kind,
                    id,
                    format!("{}@{:#04x}", existing.name(), existing.identifier()),
                    name,
                ));
            }
            return Ok(Registration::AlreadyPresent);
        }

        if self.by_name.contains_key(name) {
            return Err(CodecError::conflicting_registration(
                self.kind,
                id,
                name,
                format!("{name} (different type)"),
            ));
        }

        if let Some(existing) = self.by_id.get(&id) {
            return Err(CodecError::conflicting_registration(
                self.kind,
                id,
                existing.name(),
                name,
            ));
        }

        Ok(Registration::Added)
    }

    fn insert(&mut self, candidate: Arc<P>) -> Result<Registration> {
        let outcome = self.check(candidate.as_ref())?;
        if outcome == Registration::Added {
            debug!(
                kind = %self.kind,
                name = candidate.name(),
                identifier = candidate.identifier(),
                "registered plugin"
            );
            self.put(candidate);
        }
        Ok(outcome)
    }

    /// Insert into all three maps; `check` must have returned `Added`.
    fn put(&mut self, candidate: Arc<P>) {
        self.by_type
            .insert(type_of(candidate.as_ref()), Arc::clone(&candidate));
        self.by_id.insert(candidate.identifier(), Arc::clone(&candidate));
        self.by_name.insert(candidate.name(), candidate);
    }

    fn by_id(&self, id: u8) -> Option<Arc<P>> {
        self.by_id.get(&id).cloned()
    }

    fn by_name(&self, name: &str) -> Option<Arc<P>> {
        self.by_name.get(name).cloned()
    }

    fn by_type(&self, type_id: TypeId) -> Option<Arc<P>> {
        self.by_type.get(&type_id).cloned()
    }

    fn snapshot(&self) -> BTreeMap<&'static str, Arc<P>> {
        self.by_name
            .iter()
            .map(|(name, p)| (*name, Arc::clone(p)))
            .collect()
    }

    fn len(&self) -> usize {
        self.by_name.len()
    }
}

/// Collapse candidates of the same concrete type.
///
/// Fails if one type appears under two identifiers, or two different types
/// share a name or an identifier.
fn dedup_candidates<P: Plugin + ?Sized>(
    kind: PluginKind,
    candidates: Vec<Arc<P>>,
) -> Result<Vec<Arc<P>>> {
    let mut table = PluginTable::new(kind);
    for candidate in candidates {
        if table.check(candidate.as_ref())? == Registration::Added {
            table.put(candidate);
        }
    }
    let mut unique: Vec<Arc<P>> = table.by_id.into_values().collect();
    unique.sort_by_key(|p| p.identifier());
    Ok(unique)
}

/// Validate every candidate against `table`, then insert the new ones.
///
/// Returns `(added, already_present)`.
fn register_all<P: Plugin + ?Sized>(
    table: &mut PluginTable<P>,
    candidates: Vec<Arc<P>>,
) -> Result<(usize, usize)> {
    let mut fresh = Vec::with_capacity(candidates.len());
    let mut present = 0;
    for candidate in candidates {
        match table.check(candidate.as_ref())? {
            Registration::Added => fresh.push(candidate),
            Registration::AlreadyPresent => present += 1,
        }
    }

    let added = fresh.len();
    for candidate in fresh {
        table.insert(candidate)?;
    }
    Ok((added, present))
}

struct Catalog {
    serializers: PluginTable<dyn Serializer>,
    processors: PluginTable<dyn Processor>,
}

/// Thread-safe catalog of serializers and processors.
///
/// Populate it once from a [`PluginSource`] (and optionally manual
/// registrations), then share it by reference or `Arc`. Lookups clone an
/// `Arc` out of a short read-locked section.
pub struct PluginRegistry {
    catalog: RwLock<Catalog>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let catalog = self.read();
        f.debug_struct("PluginRegistry")
            .field("serializers", &catalog.serializers.snapshot().keys())
            .field("processors", &catalog.processors.snapshot().keys())
            .finish()
    }
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(Catalog {
                serializers: PluginTable::new(PluginKind::Serializer),
                processors: PluginTable::new(PluginKind::Processor),
            }),
        }
    }

    /// Create a registry populated by one discovery pass over `source`.
    pub fn from_source(source: &dyn PluginSource) -> Result<Self> {
        let registry = Self::new();
        registry.discover(source)?;
        Ok(registry)
    }

    // Inserts are check-then-insert with no panic between the two map
    // updates, so a poisoned lock still guards a consistent catalog.
    fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one discovery pass.
    ///
    /// Candidates are deduplicated by identifier and validated as a whole
    /// before anything is inserted: a conflict leaves the catalog untouched.
    /// Running the same pass twice adds nothing the second time.
    pub fn discover(&self, source: &dyn PluginSource) -> Result<DiscoveryReport> {
        let serializers = dedup_candidates(PluginKind::Serializer, source.serializers())?;
        let processors = dedup_candidates(PluginKind::Processor, source.processors())?;

        let mut catalog = self.write();
        for s in &serializers {
            catalog.serializers.check(s.as_ref())?;
        }
        for p in &processors {
            catalog.processors.check(p.as_ref())?;
        }

        let (serializers_added, serializers_present) =
            register_all(&mut catalog.serializers, serializers)?;
        let (processors_added, processors_present) =
            register_all(&mut catalog.processors, processors)?;

        let report = DiscoveryReport {
            serializers_added,
            serializers_present,
            processors_added,
            processors_present,
        };
        debug!(
            source = source.describe(),
            serializers_added,
            serializers_present,
            processors_added,
            processors_present,
            "plugin discovery pass complete"
        );
        Ok(report)
    }

    /// Register a serializer instance.
    pub fn register_serializer(&self, serializer: Arc<dyn Serializer>) -> Result<Registration> {
        self.write().serializers.insert(serializer)
    }

    /// Register a processor instance.
    pub fn register_processor(&self, processor: Arc<dyn Processor>) -> Result<Registration> {
        self.write().processors.insert(processor)
    }

    /// Register a serializer by value.
    pub fn add_serializer<S: Serializer>(&self, serializer: S) -> Result<Registration> {
        self.register_serializer(Arc::new(serializer))
    }

    /// Register a processor by value.
    pub fn add_processor<P: Processor>(&self, processor: P) -> Result<Registration> {
        self.register_processor(Arc::new(processor))
    }

    /// Serializer registered under `id`.
    pub fn serializer(&self, id: u8) -> Option<Arc<dyn Serializer>> {
        self.read().serializers.by_id(id)
    }

    /// Processor registered under `id`.
    pub fn processor(&self, id: u8) -> Option<Arc<dyn Processor>> {
        self.read().processors.by_id(id)
    }

    /// Serializer registered under implementation name `name`.
    pub fn serializer_named(&self, name: &str) -> Option<Arc<dyn Serializer>> {
        self.read().serializers.by_name(name)
    }

    /// Processor registered under implementation name `name`.
    pub fn processor_named(&self, name: &str) -> Option<Arc<dyn Processor>> {
        self.read().processors.by_name(name)
    }

    /// Registered serializer whose concrete type is `T`.
    ///
    /// Downcast the result with `as_any().downcast_ref::<T>()`.
    pub fn serializer_of<T: Serializer>(&self) -> Option<Arc<dyn Serializer>> {
        self.read().serializers.by_type(TypeId::of::<T>())
    }

    /// Registered processor whose concrete type is `T`.
    pub fn processor_of<T: Processor>(&self) -> Option<Arc<dyn Processor>> {
        self.read().processors.by_type(TypeId::of::<T>())
    }

    /// Snapshot of every serializer, keyed by implementation name.
    pub fn serializers(&self) -> BTreeMap<&'static str, Arc<dyn Serializer>> {
        self.read().serializers.snapshot()
    }

    /// Snapshot of every processor, keyed by implementation name.
    pub fn processors(&self) -> BTreeMap<&'static str, Arc<dyn Processor>> {
        self.read().processors.snapshot()
    }

    /// Number of registered serializers.
    pub fn serializer_count(&self) -> usize {
        self.read().serializers.len()
    }

    /// Number of registered processors.
    pub fn processor_count(&self) -> usize {
        self.read().processors.len()
    }

    /// Resolve a serializer name and processor names to instances.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownPlugin`] for any name not in the catalog.
    pub fn lookup_pipeline<S: AsRef<str>>(
        &self,
        serializer: &str,
        processors: &[S],
    ) -> Result<(Arc<dyn Serializer>, Vec<Arc<dyn Processor>>)> {
        let catalog = self.read();
        let serializer = catalog
            .serializers
            .by_name(serializer)
            .ok_or_else(|| CodecError::unknown_plugin(PluginKind::Serializer, serializer))?;
        let processors = processors
            .iter()
            .map(|name| {
                let name = name.as_ref();
                catalog
                    .processors
                    .by_name(name)
                    .ok_or_else(|| CodecError::unknown_plugin(PluginKind::Processor, name))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((serializer, processors))
    }

    /// Decode `id` against this registry. See [`codec::decode`].
    pub fn decode(&self, id: impl Into<CompositeId>) -> DecodedPipeline {
        codec::decode(self, id)
    }
}
