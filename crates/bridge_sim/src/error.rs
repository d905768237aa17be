//! Error types for world setup.
//!
//! Command application never fails; see [`crate::dispatch`]. These errors only
//! come from loading configuration and scenarios, or from script-facing
//! setters that name things by string.

use std::path::PathBuf;

/// Errors raised while building or configuring a world.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A configuration or scenario file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration or scenario file is not valid JSON for its schema.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A faction was referenced by a name that is not registered.
    #[error("unknown faction {0:?}")]
    UnknownFaction(String),

    /// A faction name was registered twice.
    #[error("duplicate faction {0:?}")]
    DuplicateFaction(String),

    /// The handle does not name a live object.
    #[error("no such object: {0}")]
    NoSuchObject(bridge_component::Entity),

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
