// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IvysnapError {
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("No configuration owns descriptor {0}")]
    OwnerNotFound(String),

    #[error("Artifacts unavailable for configuration '{config}': {reason}")]
    ArtifactUnavailable { config: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, IvysnapError>;
