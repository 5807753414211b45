// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in serializers and processors.
//!
//! | name    | kind       | identifier |
//! |---------|------------|------------|
//! | `json`  | serializer | `0x01`     |
//! | `toml`  | serializer | `0x02`     |
//! | `zstd`  | processor  | `0x10`     |
//! | `lz4`   | processor  | `0x11`     |
//! | `bzip2` | processor  | `0x12`     |
//! | `crc32` | processor  | `0x20`     |

pub mod checksum;
pub mod compression;
pub mod serializers;

use std::sync::Arc;

pub use checksum::Crc32Processor;
pub use compression::{Bzip2Processor, Lz4Processor, ZstdProcessor};
pub use serializers::{JsonSerializer, TomlSerializer};

use super::{Processor, Serializer};

/// Identifier of [`JsonSerializer`].
pub const JSON_ID: u8 = 0x01;
/// Identifier of [`TomlSerializer`].
pub const TOML_ID: u8 = 0x02;
/// Identifier of [`ZstdProcessor`].
pub const ZSTD_ID: u8 = 0x10;
/// Identifier of [`Lz4Processor`].
pub const LZ4_ID: u8 = 0x11;
/// Identifier of [`Bzip2Processor`].
pub const BZIP2_ID: u8 = 0x12;
/// Identifier of [`Crc32Processor`].
pub const CRC32_ID: u8 = 0x20;

/// Every built-in serializer.
pub fn serializers() -> Vec<Arc<dyn Serializer>> {
    vec![Arc::new(JsonSerializer), Arc::new(TomlSerializer)]
}

/// Every built-in processor.
pub fn processors() -> Vec<Arc<dyn Processor>> {
    vec![
        Arc::new(ZstdProcessor),
        Arc::new(Lz4Processor),
        Arc::new(Bzip2Processor),
        Arc::new(Crc32Processor),
    ]
}

/// Built-in serializer with the given name.
pub fn serializer_named(name: &str) -> Option<Arc<dyn Serializer>> {
    serializers().into_iter().find(|s| s.name() == name)
}

/// Built-in processor with the given name.
pub fn processor_named(name: &str) -> Option<Arc<dyn Processor>> {
    processors().into_iter().find(|p| p.name() == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_builtin_identifiers_are_unique_and_nonzero() {
        let ids: HashSet<u8> = processors().iter().map(|p| p.identifier()).collect();
        assert_eq!(ids.len(), processors().len());
        assert!(!ids.contains(&0));

        let ids: HashSet<u8> = serializers().iter().map(|s| s.identifier()).collect();
        assert_eq!(ids.len(), serializers().len());
        assert!(!ids.contains(&0));
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(serializer_named("json").unwrap().identifier(), JSON_ID);
        assert_eq!(processor_named("bzip2").unwrap().identifier(), BZIP2_ID);
        assert!(processor_named("snappy").is_none());
    }
}
