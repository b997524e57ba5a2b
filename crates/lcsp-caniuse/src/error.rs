//! Capability data errors

use std::path::PathBuf;

/// Error loading a support table
#[derive(Debug, thiserror::Error)]
pub enum CaniuseError {
    #[error("Invalid support table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
