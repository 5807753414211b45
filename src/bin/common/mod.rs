// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use anyhow::Context as _;
use transcodec::registry::{ConfigSource, PluginRegistry};
use transcodec::{Options, RegistryConfig};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Registry and default options shared by every command.
pub struct Context {
    pub registry: PluginRegistry,
    pub options: Options,
}

impl Context {
    /// Build the registry from a configuration file, or from every built-in
    /// plugin when no file is given.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => RegistryConfig::from_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => RegistryConfig::default(),
        };
        let source = ConfigSource::new(&config)?;
        let registry = PluginRegistry::from_source(&source)?;
        Ok(Self {
            registry,
            options: config.default_options(),
        })
    }

    /// Default options overlaid with `key=value` overrides.
    pub fn options_with(&self, overrides: &[String]) -> Result<Options> {
        let mut options = self.options.clone();
        for raw in overrides {
            let (key, value) = parse_option(raw)?;
            options.insert(key, value);
        }
        Ok(options)
    }
}

/// Parse a `key=value` option.
pub fn parse_option(s: &str) -> CliResult<(String, String)> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(anyhow::anyhow!("Invalid option '{s}', expected key=value")),
    }
}

/// Split a comma separated list of plugin names, ignoring empty entries.
pub fn split_names(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a byte count to a human-readable string.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
