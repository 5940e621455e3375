use std::io;
use thiserror::Error;

/// Errors that can occur while rendering or persisting a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}
