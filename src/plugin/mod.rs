// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Serializer and processor contracts.
//!
//! Every plugin carries two stable markers:
//! - an [`identifier`](Plugin::identifier) byte written into composite
//!   identifiers (never `0`, which marks an empty slot)
//! - an implementation [`name`](Plugin::name) used as the catalog key
//!
//! Built-in implementations live in [`builtin`].

pub mod builtin;

use std::any::Any;
use std::io::{Read, Write};

use serde_json::Value;

use crate::core::{Options, Result};

/// Behaviour shared by serializers and processors.
pub trait Plugin: Send + Sync + 'static {
    /// Wire identifier written into composite identifiers.
    fn identifier(&self) -> u8;

    /// Stable implementation tag (e.g., "zstd").
    ///
    /// Two instances with the same name are interchangeable.
    fn name(&self) -> &'static str;

    /// Get a reference as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Chainable, reversible byte-stream transform.
///
/// `reverse` must undo `forward` exactly for every input accepted by
/// `forward` when both receive the same options.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::io::{Read, Write};
/// use transcodec::plugin::{Plugin, Processor};
/// use transcodec::{Options, Result};
///
/// struct Invert;
///
/// impl Plugin for Invert {
///     fn identifier(&self) -> u8 { 0x7f }
///     fn name(&self) -> &'static str { "invert" }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// impl Processor for Invert {
///     fn forward(&self, input: &mut dyn Read, output: &mut dyn Write, _: &Options) -> Result<u64> {
///         let mut data = Vec::new();
///         input.read_to_end(&mut data)?;
///         data.iter_mut().for_each(|b| *b = !*b);
///         output.write_all(&data)?;
///         Ok(data.len() as u64)
///     }
///
///     fn reverse(&self, input: &mut dyn Read, output: &mut dyn Write, options: &Options) -> Result<u64> {
///         self.forward(input, output, options)
///     }
/// }
/// ```
pub trait Processor: Plugin {
    /// Transform the whole of `input` into `output`, returning the number of
    /// bytes written.
    fn forward(&self, input: &mut dyn Read, output: &mut dyn Write, options: &Options)
        -> Result<u64>;

    /// Undo [`forward`](Processor::forward), returning the number of bytes
    /// written.
    fn reverse(&self, input: &mut dyn Read, output: &mut dyn Write, options: &Options)
        -> Result<u64>;

    /// Run [`forward`](Processor::forward) over an in-memory buffer.
    fn forward_bytes(&self, data: &[u8], options: &Options) -> Result<Vec<u8>> {
        let mut input = data;
        let mut output = Vec::new();
        self.forward(&mut input, &mut output, options)?;
        Ok(output)
    }

    /// Run [`reverse`](Processor::reverse) over an in-memory buffer.
    fn reverse_bytes(&self, data: &[u8], options: &Options) -> Result<Vec<u8>> {
        let mut input = data;
        let mut output = Vec::new();
        self.reverse(&mut input, &mut output, options)?;
        Ok(output)
    }
}

/// Value to byte-stream transform.
pub trait Serializer: Plugin {
    /// Write `value` to `output`, returning the number of bytes written.
    fn serialize(&self, value: &Value, output: &mut dyn Write, options: &Options) -> Result<u64>;

    /// Read a value back from the whole of `input`.
    fn deserialize(&self, input: &mut dyn Read, options: &Options) -> Result<Value>;
}

/// Counts bytes passing through to an inner writer.
pub(crate) struct CountingWriter<'a> {
    inner: &'a mut dyn Write,
    written: u64,
}

impl<'a> CountingWriter<'a> {
    pub(crate) fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, written: 0 }
    }

    pub(crate) fn written(&self) -> u64 {
        self.written
    }
}

impl Write for CountingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
