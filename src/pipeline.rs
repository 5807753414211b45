// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Serializer + processor chains with a self-describing frame.
//!
//! A frame is the pipeline's [`CompositeId`] as 8 big-endian bytes followed
//! by the transformed payload. The receiver needs nothing but a registry to
//! undo it: processors are reversed last-to-first, then the serializer reads
//! the value back.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use transcodec::pipeline::{self, Pipeline};
//! use transcodec::registry::{BuiltinSource, PluginRegistry};
//! use transcodec::Options;
//!
//! let registry = PluginRegistry::from_source(&BuiltinSource)?;
//! let pipeline = Pipeline::from_names(&registry, "json", &["zstd", "crc32"])?;
//!
//! let value = json!({"topic": "/imu", "rate": 200});
//! let frame = pipeline.to_frame(&value, &Options::new())?;
//! assert_eq!(&frame[..8], &pipeline.id().to_be_bytes());
//!
//! let restored = pipeline::from_frame(&registry, &frame, &Options::new())?;
//! assert_eq!(restored, value);
//! # Ok::<(), transcodec::CodecError>(())
//! ```

use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::sync::Arc;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde_json::Value;
use tracing::debug;

use crate::codec::{self, CompositeId, ResolvedPipeline, COMPOSITE_ID_LEN};
use crate::core::{CodecError, Options, Result};
use crate::plugin::{Processor, Serializer};
use crate::registry::PluginRegistry;

/// A serializer followed by up to seven processors.
#[derive(Clone)]
pub struct Pipeline {
    id: CompositeId,
    serializer: Arc<dyn Serializer>,
    processors: Vec<Arc<dyn Processor>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("id", &self.id)
            .field("serializer", &self.serializer.name())
            .field(
                "processors",
                &self.processors.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl From<ResolvedPipeline> for Pipeline {
    fn from(resolved: ResolvedPipeline) -> Self {
        Self {
            id: resolved.id,
            serializer: resolved.serializer,
            processors: resolved.processors,
        }
    }
}

impl Pipeline {
    /// Build a pipeline, computing its composite identifier.
    ///
    /// # Errors
    ///
    /// Whatever [`codec::encode`] rejects: too many processors or a reserved
    /// identifier.
    pub fn new(
        serializer: Arc<dyn Serializer>,
        processors: Vec<Arc<dyn Processor>>,
    ) -> Result<Self> {
        let id = codec::encode(serializer.as_ref(), &processors)?;
        Ok(Self {
            id,
            serializer,
            processors,
        })
    }

    /// Build a pipeline from plugin names registered in `registry`.
    pub fn from_names<S: AsRef<str>>(
        registry: &PluginRegistry,
        serializer: &str,
        processors: &[S],
    ) -> Result<Self> {
        let (serializer, processors) = registry.lookup_pipeline(serializer, processors)?;
        Self::new(serializer, processors)
    }

    /// Composite identifier of this pipeline.
    pub fn id(&self) -> CompositeId {
        self.id
    }

    /// The serializer.
    pub fn serializer(&self) -> &Arc<dyn Serializer> {
        &self.serializer
    }

    /// Processors in forward order.
    pub fn processors(&self) -> &[Arc<dyn Processor>] {
        &self.processors
    }

    /// Serialize `value` and run every processor forward, without a prefix.
    pub fn encode_payload(&self, value: &Value, options: &Options) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        self.serializer.serialize(value, &mut payload, options)?;
        for processor in &self.processors {
            payload = processor.forward_bytes(&payload, options)?;
        }
        Ok(payload)
    }

    /// Run every processor in reverse order, then deserialize.
    pub fn decode_payload(&self, payload: &[u8], options: &Options) -> Result<Value> {
        let mut data = payload.to_vec();
        for processor in self.processors.iter().rev() {
            data = processor.reverse_bytes(&data, options)?;
        }
        self.serializer.deserialize(&mut data.as_slice(), options)
    }

    /// Write a frame for `value`, returning the number of bytes written.
    pub fn write_frame(
        &self,
        value: &Value,
        output: &mut dyn Write,
        options: &Options,
    ) -> Result<u64> {
        let payload = self.encode_payload(value, options)?;
        output.write_u64::<BigEndian>(self.id.value())?;
        output.write_all(&payload)?;
        debug!(
            id = %self.id,
            payload_len = payload.len(),
            "wrote frame"
        );
        Ok((COMPOSITE_ID_LEN + payload.len()) as u64)
    }

    /// Encode `value` into an in-memory frame.
    pub fn to_frame(&self, value: &Value, options: &Options) -> Result<Vec<u8>> {
        let mut frame = Vec::new();
        self.write_frame(value, &mut frame, options)?;
        Ok(frame)
    }
}

/// Read the composite identifier prefix of a frame.
pub fn read_id(input: &mut dyn Read) -> Result<CompositeId> {
    match input.read_u64::<BigEndian>() {
        Ok(value) => Ok(CompositeId::new(value)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(CodecError::frame(format!(
            "frame is shorter than the {COMPOSITE_ID_LEN}-byte identifier prefix"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Decode the prefix of a frame and resolve the whole pipeline.
///
/// # Errors
///
/// [`CodecError::UnknownIdentifier`] if any plugin is not registered.
pub fn resolve_frame(registry: &PluginRegistry, input: &mut dyn Read) -> Result<Pipeline> {
    let id = read_id(input)?;
    Ok(codec::decode(registry, id).resolve()?.into())
}

/// Read a whole frame from `input` and recover its value.
pub fn read_frame(
    registry: &PluginRegistry,
    input: &mut dyn Read,
    options: &Options,
) -> Result<Value> {
    let pipeline = resolve_frame(registry, input)?;
    let mut payload = Vec::new();
    input.read_to_end(&mut payload)?;
    debug!(id = %pipeline.id(), payload_len = payload.len(), "read frame");
    pipeline.decode_payload(&payload, options)
}

/// Recover the value held in an in-memory frame.
pub fn from_frame(registry: &PluginRegistry, frame: &[u8], options: &Options) -> Result<Value> {
    let mut input = frame;
    read_frame(registry, &mut input, options)
}
