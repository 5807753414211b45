// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compression processors: zstd, LZ4 and bzip2.

use std::any::Any;
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{BZIP2_ID, LZ4_ID, ZSTD_ID};
use crate::core::{int_option, CodecError, Options, Result};
use crate::plugin::{CountingWriter, Plugin, Processor};

/// Option key for the zstd compression level (1..=22).
pub const ZSTD_LEVEL_OPTION: &str = "zstd.level";
/// Option key for the bzip2 block size level (1..=9).
pub const BZIP2_LEVEL_OPTION: &str = "bzip2.level";

const ZSTD_DEFAULT_LEVEL: i32 = 3;
const BZIP2_DEFAULT_LEVEL: i32 = 6;

const LZ4_SIZE_PREFIX_LEN: usize = 4;
const LZ4_MAX_RATIO: usize = 255;

/// Zstandard stream compression.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdProcessor;

impl Plugin for ZstdProcessor {
    fn identifier(&self) -> u8 {
        ZSTD_ID
    }

    fn name(&self) -> &'static str {
        "zstd"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Processor for ZstdProcessor {
    fn forward(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        options: &Options,
    ) -> Result<u64> {
        let level = int_option(options, ZSTD_LEVEL_OPTION, 1..=22, ZSTD_DEFAULT_LEVEL)?;
        let mut writer = CountingWriter::new(output);
        zstd::stream::copy_encode(&mut *input, &mut writer, level)
            .map_err(|e| CodecError::transform(self.name(), e.to_string()))?;
        Ok(writer.written())
    }

    fn reverse(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        _options: &Options,
    ) -> Result<u64> {
        let mut writer = CountingWriter::new(output);
        zstd::stream::copy_decode(&mut *input, &mut writer)
            .map_err(|e| CodecError::transform(self.name(), e.to_string()))?;
        Ok(writer.written())
    }
}

/// LZ4 block compression with the uncompressed size prepended.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Processor;

impl Plugin for Lz4Processor {
    fn identifier(&self) -> u8 {
        LZ4_ID
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Processor for Lz4Processor {
    fn forward(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        _options: &Options,
    ) -> Result<u64> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        let compressed = lz4_flex::compress_prepend_size(&data);
        output.write_all(&compressed)?;
        Ok(compressed.len() as u64)
    }

    fn reverse(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        _options: &Options,
    ) -> Result<u64> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        if data.len() < LZ4_SIZE_PREFIX_LEN {
            return Err(CodecError::transform(
                self.name(),
                format!("input of {} bytes lacks the size prefix", data.len()),
            ));
        }
        let (mut prefix, block) = data.split_at(LZ4_SIZE_PREFIX_LEN);
        let size = prefix.read_u32::<LittleEndian>()? as usize;

        // An LZ4 block cannot expand by more than 255x.
        if size > block.len().saturating_mul(LZ4_MAX_RATIO) {
            return Err(CodecError::transform(
                self.name(),
                format!(
                    "declared size {size} is impossible for a {}-byte block",
                    block.len()
                ),
            ));
        }

        let decompressed = lz4_flex::decompress(block, size)
            .map_err(|e| CodecError::transform(self.name(), e.to_string()))?;
        if decompressed.len() != size {
            return Err(CodecError::transform(
                self.name(),
                format!(
                    "decompressed {} bytes, size prefix declares {size}",
                    decompressed.len()
                ),
            ));
        }
        output.write_all(&decompressed)?;
        Ok(decompressed.len() as u64)
    }
}

/// bzip2 stream compression.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bzip2Processor;

impl Plugin for Bzip2Processor {
    fn identifier(&self) -> u8 {
        BZIP2_ID
    }

    fn name(&self) -> &'static str {
        "bzip2"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Processor for Bzip2Processor {
    fn forward(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        options: &Options,
    ) -> Result<u64> {
        use bzip2::read::BzEncoder;

        let level = int_option(options, BZIP2_LEVEL_OPTION, 1..=9, BZIP2_DEFAULT_LEVEL)?;
        let mut encoder = BzEncoder::new(&mut *input, bzip2::Compression::new(level as u32));
        io::copy(&mut encoder, output)
            .map_err(|e| CodecError::transform(self.name(), e.to_string()))
    }

    fn reverse(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        _options: &Options,
    ) -> Result<u64> {
        use bzip2::read::BzDecoder;

        let mut decoder = BzDecoder::new(&mut *input);
        io::copy(&mut decoder, output)
            .map_err(|e| CodecError::transform(self.name(), e.to_string()))
    }
}
