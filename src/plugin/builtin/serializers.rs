// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON and TOML serializers.

use std::any::Any;
use std::io::{Read, Write};

use serde_json::Value;

use super::{JSON_ID, TOML_ID};
use crate::core::{CodecError, Options, Result};
use crate::plugin::{CountingWriter, Plugin, Serializer};

/// Option key enabling pretty-printed JSON output.
pub const JSON_PRETTY_OPTION: &str = "json.pretty";

/// JSON serializer backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Plugin for JsonSerializer {
    fn identifier(&self) -> u8 {
        JSON_ID
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value, output: &mut dyn Write, options: &Options) -> Result<u64> {
        let pretty = options
            .get(JSON_PRETTY_OPTION)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let mut writer = CountingWriter::new(output);
        let res = if pretty {
            serde_json::to_writer_pretty(&mut writer, value)
        } else {
            serde_json::to_writer(&mut writer, value)
        };
        res.map_err(|e| CodecError::transform(self.name(), e.to_string()))?;
        Ok(writer.written())
    }

    fn deserialize(&self, input: &mut dyn Read, _options: &Options) -> Result<Value> {
        serde_json::from_reader(input).map_err(|e| CodecError::transform(self.name(), e.to_string()))
    }
}

/// TOML serializer. Only table-shaped values without nulls can be written.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlSerializer;

impl Plugin for TomlSerializer {
    fn identifier(&self) -> u8 {
        TOML_ID
    }

    fn name(&self) -> &'static str {
        "toml"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Serializer for TomlSerializer {
    fn serialize(&self, value: &Value, output: &mut dyn Write, _options: &Options) -> Result<u64> {
        if !value.is_object() {
            return Err(CodecError::transform(
                self.name(),
                "top-level value must be a table",
            ));
        }
        let text =
            toml::to_string(value).map_err(|e| CodecError::transform(self.name(), e.to_string()))?;
        output.write_all(text.as_bytes())?;
        Ok(text.len() as u64)
    }

    fn deserialize(&self, input: &mut dyn Read, _options: &Options) -> Result<Value> {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .map_err(|e| CodecError::transform(self.name(), e.to_string()))?;
        toml::from_str(&text).map_err(|e| CodecError::transform(self.name(), e.to_string()))
    }
}
