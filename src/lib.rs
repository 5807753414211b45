// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Transcodec
//!
//! Registry of pluggable serializers and processors, plus a 64-bit composite
//! identifier that records which serializer and which ordered chain of
//! processors produced a byte stream.
//!
//! ## Architecture
//!
//! - `plugin/` - [`Serializer`] and [`Processor`] contracts and the built-in
//!   implementations (JSON, TOML, zstd, LZ4, bzip2, CRC-32)
//! - `codec/` - pure encoding of a pipeline into a [`CompositeId`] and
//!   registry-backed decoding
//! - `registry/` - [`PluginRegistry`], discovery sources and the lazily
//!   initialized [`LazyRegistry`]
//! - `config` - TOML configuration selecting plugins and default options
//! - `pipeline` - runs a pipeline and frames its output behind the
//!   composite identifier
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use transcodec::codec;
//! use transcodec::registry::{BuiltinSource, PluginRegistry};
//!
//! let registry = PluginRegistry::from_source(&BuiltinSource)?;
//! let (serializer, processors) = registry.lookup_pipeline("json", &["zstd", "crc32"])?;
//!
//! let id = codec::encode(serializer.as_ref(), &processors)?;
//! assert_eq!(id.value(), 0x0110_2000_0000_0000);
//!
//! let decoded = registry.decode(id).resolve()?;
//! assert_eq!(decoded.serializer.name(), "json");
//! assert_eq!(decoded.processors.len(), 2);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use crate::core::{CodecError, Options, PluginKind, Result};

// Plugin contracts and built-ins
pub mod plugin;

pub use plugin::{Plugin, Processor, Serializer};

// Composite identifier codec
pub mod codec;

pub use codec::{CompositeId, DecodedPipeline, ResolvedPipeline, MAX_PROCESSORS};

// Registry and discovery
pub mod registry;

pub use registry::{DiscoveryReport, LazyRegistry, PluginRegistry, PluginSource, Registration};

// Configuration
pub mod config;

pub use config::RegistryConfig;

// Framed pipelines
pub mod pipeline;

pub use pipeline::Pipeline;
