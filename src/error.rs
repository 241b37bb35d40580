//! Error types for the digest pipeline.
//!
//! The renderer and the feed builder never fail; everything that can go
//! wrong lives at the edges (reading digests, loading article records,
//! writing outputs) and is reported through [`DigestError`].

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop or degrade a pipeline stage.
#[derive(Debug, Error)]
pub enum DigestError {
    /// No digest file or no article records were found.
    ///
    /// The binary treats this as a graceful stop: it is logged, nothing is
    /// written, and the process exits with a non-zero status.
    #[error("No input found at {path}: {reason}")]
    InputNotFound { path: PathBuf, reason: String },

    /// A persisted article record could not be parsed.
    ///
    /// Only that record is dropped; feed assembly carries on with the rest.
    #[error("Malformed article record {path}: {source}")]
    MalformedRecord {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The digest text was empty or contained only whitespace.
    #[error("Digest text is empty")]
    EmptyInput,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write feed XML: {0}")]
    Xml(std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DigestError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DigestError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the run should end quietly rather than as a failure.
    pub fn is_input_not_found(&self) -> bool {
        matches!(self, DigestError::InputNotFound { .. })
    }
}
