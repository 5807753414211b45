// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Registry configuration.
//!
//! Selects which built-in plugins are registered and which default options
//! are handed to every transform.
//!
//! ```toml
//! [serializers]
//! enabled = ["json", "toml"]
//!
//! [processors]
//! enabled = ["zstd", "lz4"]
//!
//! [options]
//! "zstd.level" = "9"
//! ```
//!
//! A missing section enables every built-in of that kind.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::core::{CodecError, Options, PluginKind, Result};
use crate::plugin::builtin;
use crate::plugin::{Processor, Serializer};

/// Names of enabled plugins of one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginSelection {
    /// Implementation names, e.g. `["zstd", "lz4"]`
    #[serde(default)]
    pub enabled: Vec<String>,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Serializers to register; all built-ins when absent
    #[serde(default)]
    pub serializers: Option<PluginSelection>,
    /// Processors to register; all built-ins when absent
    #[serde(default)]
    pub processors: Option<PluginSelection>,
    /// Default transform options
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl FromStr for RegistryConfig {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CodecError::config(e.to_string()))
    }
}

impl RegistryConfig {
    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CodecError::config(format!("{}: {e}", path.display())))?;
        text.parse()
    }

    /// Built-in serializers selected by this configuration.
    pub fn enabled_serializers(&self) -> Result<Vec<Arc<dyn Serializer>>> {
        match &self.serializers {
            None => Ok(builtin::serializers()),
            Some(selection) => selection
                .enabled
                .iter()
                .map(|name| {
                    builtin::serializer_named(name)
                        .ok_or_else(|| CodecError::unknown_plugin(PluginKind::Serializer, name))
                })
                .collect(),
        }
    }

    /// Built-in processors selected by this configuration.
    pub fn enabled_processors(&self) -> Result<Vec<Arc<dyn Processor>>> {
        match &self.processors {
            None => Ok(builtin::processors()),
            Some(selection) => selection
                .enabled
                .iter()
                .map(|name| {
                    builtin::processor_named(name)
                        .ok_or_else(|| CodecError::unknown_plugin(PluginKind::Processor, name))
                })
                .collect(),
        }
    }

    /// Default options as a transform options map.
    pub fn default_options(&self) -> Options {
        self.options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
