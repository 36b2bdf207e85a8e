//! Error types for document building operations

use std::path::PathBuf;

/// Errors raised while publishing a document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No page matched the requested identifier
    #[error("Document '{0}' not found")]
    NotFound(String),
    /// A page record lacks a required field, or the field has the wrong shape
    #[error("Malformed source record: field '{field}' {reason}")]
    MalformedRecord { field: String, reason: String },
    /// The block store or page resolver failed mid-traversal
    #[error(transparent)]
    Source(#[from] SourceError),
    /// The renderer could not produce an output node
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by block store and page resolver collaborators
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport-level failure (network, pagination cursor, permissions)
    #[error("Transport error: {0}")]
    Transport(String),
    /// An identifier cannot be used to address the snapshot
    #[error("Invalid block id '{0}'")]
    InvalidId(String),
    /// A record could not be decoded
    #[error("Decode error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    /// Reading a local snapshot failed
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while mirroring a remote asset
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Invalid asset URL '{0}'")]
    InvalidUrl(String),
    #[error("Fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Writing {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
