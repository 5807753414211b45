// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CRC-32 integrity processor.
//!
//! Forward appends a big-endian CRC-32 of the payload; reverse verifies and
//! strips it.

use std::any::Any;
use std::io::{Read, Write};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::CRC32_ID;
use crate::core::{CodecError, Options, Result};
use crate::plugin::{Plugin, Processor};

const CHECKSUM_LEN: usize = 4;

/// Appends and verifies a CRC-32 trailer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32Processor;

impl Plugin for Crc32Processor {
    fn identifier(&self) -> u8 {
        CRC32_ID
    }

    fn name(&self) -> &'static str {
        "crc32"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Processor for Crc32Processor {
    fn forward(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        _options: &Options,
    ) -> Result<u64> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        output.write_all(&data)?;
        output.write_u32::<BigEndian>(crc32fast::hash(&data))?;
        Ok((data.len() + CHECKSUM_LEN) as u64)
    }

    fn reverse(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        _options: &Options,
    ) -> Result<u64> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        if data.len() < CHECKSUM_LEN {
            return Err(CodecError::transform(
                self.name(),
                format!("input of {} bytes is shorter than the checksum", data.len()),
            ));
        }
        let (payload, trailer) = data.split_at(data.len() - CHECKSUM_LEN);
        let expected = BigEndian::read_u32(trailer);
        let actual = crc32fast::hash(payload);
        if expected != actual {
            return Err(CodecError::transform(
                self.name(),
                format!("checksum mismatch: expected {expected:#010x}, computed {actual:#010x}"),
            ));
        }
        output.write_all(payload)?;
        Ok(payload.len() as u64)
    }
}
