// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for transcodec.
//!
//! Provides error types for:
//! - Composite identifier encoding
//! - Plugin registration and lookup
//! - Configuration parsing
//! - Stream transforms performed by plugins

use std::fmt;

use super::PluginKind;

/// Errors that can occur while registering plugins or running pipelines.
#[derive(Debug, Clone)]
pub enum CodecError {
    /// More processors were supplied than a composite identifier can hold
    TooManyProcessors {
        /// Number of processors supplied
        count: usize,
        /// Maximum number of processor slots
        max: usize,
    },

    /// Two different implementations claim the same identifier, or one
    /// implementation claims two identifiers
    ConflictingRegistration {
        /// Plugin kind
        kind: PluginKind,
        /// Contested identifier
        identifier: u8,
        /// Implementation already bound
        existing: String,
        /// Implementation attempting to register
        incoming: String,
    },

    /// Plugin declared the reserved identifier 0
    ReservedIdentifier {
        /// Plugin kind
        kind: PluginKind,
        /// Implementation name
        name: String,
    },

    /// No plugin is registered under an identifier
    UnknownIdentifier {
        /// Plugin kind
        kind: PluginKind,
        /// Identifier that could not be resolved
        identifier: u8,
    },

    /// No plugin is registered under a name
    UnknownPlugin {
        /// Plugin kind
        kind: PluginKind,
        /// Name that could not be resolved
        name: String,
    },

    /// Transform option has an unusable value
    InvalidOption {
        /// Option key
        key: String,
        /// Offending value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Configuration could not be loaded
    Config {
        /// Error message
        message: String,
    },

    /// Frame is malformed
    Frame {
        /// Error message
        message: String,
    },

    /// A plugin failed to transform its input
    Transform {
        /// Plugin name (e.g., "zstd", "json")
        plugin: String,
        /// Error message
        message: String,
    },

    /// I/O error while reading or writing a stream
    Io(String),

    /// Other error
    Other(String),
}

impl CodecError {
    /// Create a "too many processors" error.
    pub fn too_many_processors(count: usize, max: usize) -> Self {
        CodecError::TooManyProcessors { count, max }
    }

    /// Create a conflicting registration error.
    pub fn conflicting_registration(
        kind: PluginKind,
        identifier: u8,
        existing: impl Into<String>,
        incoming: impl Into<String>,
    ) -> Self {
        CodecError::ConflictingRegistration {
            kind,
            identifier,
            existing: existing.into(),
            incoming: incoming.into(),
        }
    }

    /// Create a reserved identifier error.
    pub fn reserved_identifier(kind: PluginKind, name: impl Into<String>) -> Self {
        CodecError::ReservedIdentifier {
            kind,
            name: name.into(),
        }
    }

    /// Create an unknown identifier error.
    pub fn unknown_identifier(kind: PluginKind, identifier: u8) -> Self {
        CodecError::UnknownIdentifier { kind, identifier }
    }

    /// Create an unknown plugin error.
    pub fn unknown_plugin(kind: PluginKind, name: impl Into<String>) -> Self {
        CodecError::UnknownPlugin {
            kind,
            name: name.into(),
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CodecError::InvalidOption {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CodecError::Config {
            message: message.into(),
        }
    }

    /// Create a frame error.
    pub fn frame(message: impl Into<String>) -> Self {
        CodecError::Frame {
            message: message.into(),
        }
    }

    /// Create a transform error.
    pub fn transform(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Transform {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Whether this error signals a configuration problem that should abort
    /// registry initialization.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CodecError::ConflictingRegistration { .. }
                | CodecError::ReservedIdentifier { .. }
                | CodecError::UnknownPlugin { .. }
                | CodecError::Config { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::TooManyProcessors { count, max } => {
                vec![("count", count.to_string()), ("max", max.to_string())]
            }
            CodecError::ConflictingRegistration {
                kind,
                identifier,
                existing,
                incoming,
            } => vec![
                ("kind", kind.to_string()),
                ("identifier", format!("{identifier:#04x}")),
                ("existing", existing.clone()),
                ("incoming", incoming.clone()),
            ],
            CodecError::ReservedIdentifier { kind, name } => {
                vec![("kind", kind.to_string()), ("name", name.clone())]
            }
            CodecError::UnknownIdentifier { kind, identifier } => vec![
                ("kind", kind.to_string()),
                ("identifier", format!("{identifier:#04x}")),
            ],
            CodecError::UnknownPlugin { kind, name } => {
                vec![("kind", kind.to_string()), ("name", name.clone())]
            }
            CodecError::InvalidOption { key, value, reason } => vec![
                ("key", key.clone()),
                ("value", value.clone()),
                ("reason", reason.clone()),
            ],
            CodecError::Config { message } => vec![("message", message.clone())],
            CodecError::Frame { message } => vec![("message", message.clone())],
            CodecError::Transform { plugin, message } => {
                vec![("plugin", plugin.clone()), ("message", message.clone())]
            }
            CodecError::Io(msg) => vec![("message", msg.clone())],
            CodecError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::TooManyProcessors { count, max } => write!(
                f,
                "Too many processors: {count} supplied, at most {max} fit in a composite identifier"
            ),
            CodecError::ConflictingRegistration {
                kind,
                identifier,
                existing,
                incoming,
            } => write!(
                f,
                "Conflicting {kind} registration for identifier {identifier:#04x}: '{incoming}' clashes with '{existing}'"
            ),
            CodecError::ReservedIdentifier { kind, name } => write!(
                f,
                "{kind} '{name}' uses reserved identifier 0x00"
            ),
            CodecError::UnknownIdentifier { kind, identifier } => {
                write!(f, "No {kind} registered for identifier {identifier:#04x}")
            }
            CodecError::UnknownPlugin { kind, name } => {
                write!(f, "No {kind} registered under name '{name}'")
            }
            CodecError::InvalidOption { key, value, reason } => {
                write!(f, "Invalid option {key}='{value}': {reason}")
            }
            CodecError::Config { message } => write!(f, "Configuration error: {message}"),
            CodecError::Frame { message } => write!(f, "Malformed frame: {message}"),
            CodecError::Transform { plugin, message } => {
                write!(f, "{plugin} transform error: {message}")
            }
            CodecError::Io(msg) => write!(f, "I/O error: {msg}"),
            CodecError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::Io(err.to_string())
    }
}

/// Result type for transcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
