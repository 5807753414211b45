// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Composite identifier codec.
//!
//! A composite identifier packs one serializer and up to seven processors
//! into a `u64`:
//!
//! ```text
//!  byte:   7          6       5       4       3       2       1       0
//!        +----------+-------+-------+-------+-------+-------+-------+-------+
//!        | serializer| p[0] | p[1]  | p[2]  | p[3]  | p[4]  | p[5]  | p[6]  |
//!        +----------+-------+-------+-------+-------+-------+-------+-------+
//! ```
//!
//! Unused processor slots are zero and only ever trail the used ones.
//! Encoding is pure; decoding resolves identifiers through a
//! [`PluginRegistry`].
//!
//! # Example
//!
//! ```
//! use transcodec::codec::{self, CompositeId};
//!
//! let id = codec::encode_ids(0x01, &[0x02, 0x03])?;
//! assert_eq!(id, CompositeId::new(0x0102_0300_0000_0000));
//! assert_eq!(id.serializer_id(), 0x01);
//! assert_eq!(id.processor_ids(), vec![0x02, 0x03]);
//! # Ok::<(), transcodec::CodecError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::core::{CodecError, PluginKind, Result, RESERVED_IDENTIFIER};
use crate::plugin::{Processor, Serializer};
use crate::registry::PluginRegistry;

/// Maximum number of processors a composite identifier can describe.
pub const MAX_PROCESSORS: usize = 7;

/// Size in bytes of an encoded composite identifier.
pub const COMPOSITE_ID_LEN: usize = 8;

/// Serializer identifier plus an ordered processor chain, packed in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CompositeId(u64);

impl CompositeId {
    /// Wrap a raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw `u64` value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Byte at `index` (0 = least significant).
    pub const fn byte(self, index: usize) -> u8 {
        (self.0 >> (8 * index)) as u8
    }

    /// Serializer identifier held in the most significant byte.
    pub const fn serializer_id(self) -> u8 {
        self.byte(COMPOSITE_ID_LEN - 1)
    }

    /// Nonzero processor identifiers in forward application order.
    pub fn processor_ids(self) -> Vec<u8> {
        (0..MAX_PROCESSORS)
            .rev()
            .map(|i| self.byte(i))
            .filter(|&id| id != RESERVED_IDENTIFIER)
            .collect()
    }

    /// Whether the layout matches what [`encode`] produces: no nonzero
    /// processor byte follows a zero one.
    pub fn is_canonical(self) -> bool {
        let mut seen_gap = false;
        for i in (0..MAX_PROCESSORS).rev() {
            if self.byte(i) == RESERVED_IDENTIFIER {
                seen_gap = true;
            } else if seen_gap {
                return false;
            }
        }
        true
    }

    /// Big-endian bytes, suitable as a frame prefix.
    pub const fn to_be_bytes(self) -> [u8; COMPOSITE_ID_LEN] {
        self.0.to_be_bytes()
    }

    /// Build from big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; COMPOSITE_ID_LEN]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl From<u64> for CompositeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<CompositeId> for u64 {
    fn from(id: CompositeId) -> Self {
        id.0
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Error returned when parsing a `CompositeId` from string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCompositeIdError {
    input: String,
}

impl fmt::Display for ParseCompositeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid composite identifier '{}', expected up to 16 hex digits",
            self.input
        )
    }
}

impl std::error::Error for ParseCompositeIdError {}

impl std::str::FromStr for CompositeId {
    type Err = ParseCompositeIdError;

    /// Parse hex, with or without a `0x` prefix and `_` separators.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits: String = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed)
            .chars()
            .filter(|c| *c != '_')
            .collect();
        if digits.is_empty()
            || digits.len() > 16
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ParseCompositeIdError {
                input: s.to_string(),
            });
        }
        u64::from_str_radix(&digits, 16)
            .map(CompositeId)
            .map_err(|_| ParseCompositeIdError {
                input: s.to_string(),
            })
    }
}

/// Pack raw identifiers into a composite identifier.
///
/// # Errors
///
/// - [`CodecError::TooManyProcessors`] for more than [`MAX_PROCESSORS`]
///   processor identifiers
/// - [`CodecError::ReservedIdentifier`] if any identifier is `0`
pub fn encode_ids(serializer_id: u8, processor_ids: &[u8]) -> Result<CompositeId> {
    if processor_ids.len() > MAX_PROCESSORS {
        return Err(CodecError::too_many_processors(
            processor_ids.len(),
            MAX_PROCESSORS,
        ));
    }
    if serializer_id == RESERVED_IDENTIFIER {
        return Err(CodecError::reserved_identifier(
            PluginKind::Serializer,
            format!("{serializer_id:#04x}"),
        ));
    }

    let mut value = u64::from(serializer_id) << (8 * (COMPOSITE_ID_LEN - 1));
    for (slot, &id) in processor_ids.iter().enumerate() {
        if id == RESERVED_IDENTIFIER {
            return Err(CodecError::reserved_identifier(
                PluginKind::Processor,
                format!("slot {slot}"),
            ));
        }
        value |= u64::from(id) << (8 * (MAX_PROCESSORS - 1 - slot));
    }
    Ok(CompositeId(value))
}

/// Pack a serializer and an ordered processor chain into a composite
/// identifier.
///
/// Only the identifiers carried by the instances are used; the registry is
/// not consulted.
pub fn encode(
    serializer: &dyn Serializer,
    processors: &[Arc<dyn Processor>],
) -> Result<CompositeId> {
    if processors.len() > MAX_PROCESSORS {
        return Err(CodecError::too_many_processors(
            processors.len(),
            MAX_PROCESSORS,
        ));
    }
    if serializer.identifier() == RESERVED_IDENTIFIER {
        return Err(CodecError::reserved_identifier(
            PluginKind::Serializer,
            serializer.name(),
        ));
    }
    if let Some(p) = processors
        .iter()
        .find(|p| p.identifier() == RESERVED_IDENTIFIER)
    {
        return Err(CodecError::reserved_identifier(
            PluginKind::Processor,
            p.name(),
        ));
    }

    let ids: Vec<u8> = processors.iter().map(|p| p.identifier()).collect();
    encode_ids(serializer.identifier(), &ids)
}

/// Result of decoding a composite identifier against a registry.
///
/// Unresolved identifiers are kept as `None` slots; call
/// [`resolve`](DecodedPipeline::resolve) before reversing a pipeline.
#[derive(Clone)]
pub struct DecodedPipeline {
    id: CompositeId,
    serializer: Option<Arc<dyn Serializer>>,
    processors: Vec<Option<Arc<dyn Processor>>>,
}

impl fmt::Debug for DecodedPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedPipeline")
            .field("id", &self.id)
            .field("serializer", &self.serializer.as_ref().map(|s| s.name()))
            .field(
                "processors",
                &self
                    .processors
                    .iter()
                    .map(|p| p.as_ref().map(|p| p.name()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl DecodedPipeline {
    /// Identifier this pipeline was decoded from.
    pub fn id(&self) -> CompositeId {
        self.id
    }

    /// Serializer, if its identifier is registered.
    pub fn serializer(&self) -> Option<&Arc<dyn Serializer>> {
        self.serializer.as_ref()
    }

    /// Processor slots in forward application order.
    pub fn processors(&self) -> &[Option<Arc<dyn Processor>>] {
        &self.processors
    }

    /// Whether the serializer and every processor resolved.
    pub fn is_complete(&self) -> bool {
        self.serializer.is_some() && self.processors.iter().all(Option::is_some)
    }

    /// Identifiers that did not resolve, tagged with their kind.
    pub fn unresolved(&self) -> Vec<(PluginKind, u8)> {
        let mut missing = Vec::new();
        if self.serializer.is_none() {
            missing.push((PluginKind::Serializer, self.id.serializer_id()));
        }
        for (slot, id) in self.processors.iter().zip(self.id.processor_ids()) {
            if slot.is_none() {
                missing.push((PluginKind::Processor, id));
            }
        }
        missing
    }

    /// Require every slot to be resolved.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownIdentifier`] naming the first unresolved slot.
    pub fn resolve(self) -> Result<ResolvedPipeline> {
        if let Some((kind, identifier)) = self.unresolved().into_iter().next() {
            return Err(CodecError::unknown_identifier(kind, identifier));
        }
        Ok(ResolvedPipeline {
            id: self.id,
            serializer: self.serializer.ok_or_else(|| {
                CodecError::unknown_identifier(PluginKind::Serializer, self.id.serializer_id())
            })?,
            processors: self.processors.into_iter().flatten().collect(),
        })
    }
}

/// Fully resolved pipeline.
#[derive(Clone)]
pub struct ResolvedPipeline {
    /// Identifier this pipeline was decoded from
    pub id: CompositeId,
    /// Serializer
    pub serializer: Arc<dyn Serializer>,
    /// Processors in forward application order
    pub processors: Vec<Arc<dyn Processor>>,
}

impl fmt::Debug for ResolvedPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPipeline")
            .field("id", &self.id)
            .field("serializer", &self.serializer.name())
            .field(
                "processors",
                &self.processors.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Recover the serializer and processor chain described by `id`.
///
/// Never fails: identifiers with no registered plugin come back as `None`
/// slots. Zero bytes are skipped wherever they appear.
pub fn decode(registry: &PluginRegistry, id: impl Into<CompositeId>) -> DecodedPipeline {
    let id = id.into();
    if !id.is_canonical() {
        warn!(id = %id, "composite identifier has a processor after an empty slot");
    }

    let serializer = registry.serializer(id.serializer_id());
    if serializer.is_none() {
        warn!(
            id = %id,
            identifier = id.serializer_id(),
            "no serializer registered for identifier"
        );
    }

    let processors = id
        .processor_ids()
        .into_iter()
        .map(|pid| {
            let processor = registry.processor(pid);
            if processor.is_none() {
                warn!(id = %id, identifier = pid, "no processor registered for identifier");
            }
            processor
        })
        .collect();

    DecodedPipeline {
        id,
        serializer,
        processors,
    }
}
