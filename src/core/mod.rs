// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout transcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Comprehensive error handling
//! - [`PluginKind`] - Serializer / processor discriminator
//! - [`Options`] - String options passed to every transform

pub mod error;

use std::collections::HashMap;

pub use error::{CodecError, Result};

/// Options mapping handed to serializers and processors
/// (e.g., `"zstd.level" => "9"`).
pub type Options = HashMap<String, String>;

/// Identifier value reserved to mean "no plugin in this slot".
pub const RESERVED_IDENTIFIER: u8 = 0;

/// Kind of plugin held by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginKind {
    /// Value to bytes transform
    Serializer,
    /// Chainable, reversible bytes to bytes transform
    Processor,
}

/// Error returned when parsing a `PluginKind` from string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePluginKindError {
    _private: (),
}

impl std::fmt::Display for ParsePluginKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid plugin kind, expected 'serializer' or 'processor'")
    }
}

impl std::error::Error for ParsePluginKindError {}

impl std::str::FromStr for PluginKind {
    type Err = ParsePluginKindError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "serializer" => Ok(PluginKind::Serializer),
            "processor" => Ok(PluginKind::Processor),
            _ => Err(ParsePluginKindError { _private: () }),
        }
    }
}

impl std::fmt::Display for PluginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PluginKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Serializer => "serializer",
            PluginKind::Processor => "processor",
        }
    }
}

/// Read an integer option bounded to `range`, falling back to `default`
/// when the key is absent.
pub fn int_option(
    options: &Options,
    key: &str,
    range: std::ops::RangeInclusive<i32>,
    default: i32,
) -> Result<i32> {
    let Some(raw) = options.get(key) else {
        return Ok(default);
    };
    let value: i32 = raw
        .trim()
        .parse()
        .map_err(|_| CodecError::invalid_option(key, raw.as_str(), "expected an integer"))?;
    if !range.contains(&value) {
        return Err(CodecError::invalid_option(
            key,
            raw.as_str(),
            format!("must be within {}..={}", range.start(), range.end()),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_kind_from_str() {
        assert_eq!("serializer".parse::<PluginKind>(), Ok(PluginKind::Serializer));
        assert_eq!("Processor".parse::<PluginKind>(), Ok(PluginKind::Processor));
        assert!("codec".parse::<PluginKind>().is_err());
    }

    #[test]
    fn test_plugin_kind_display() {
        assert_eq!(PluginKind::Serializer.to_string(), "serializer");
        assert_eq!(PluginKind::Processor.as_str(), "processor");
    }

    #[test]
    fn test_int_option_default() {
        let options = Options::new();
        assert_eq!(int_option(&options, "zstd.level", 1..=22, 3).unwrap(), 3);
    }

    #[test]
    fn test_int_option_parsed() {
        let mut options = Options::new();
        options.insert("zstd.level".to_string(), " 19 ".to_string());
        assert_eq!(int_option(&options, "zstd.level", 1..=22, 3).unwrap(), 19);
    }

    #[test]
    fn test_int_option_rejected() {
        let mut options = Options::new();
        options.insert("bzip2.level".to_string(), "12".to_string());
        let err = int_option(&options, "bzip2.level", 1..=9, 6).unwrap_err();
        assert!(matches!(err, CodecError::InvalidOption { .. }));

        options.insert("bzip2.level".to_string(), "max".to_string());
        assert!(int_option(&options, "bzip2.level", 1..=9, 6).is_err());
    }
}
