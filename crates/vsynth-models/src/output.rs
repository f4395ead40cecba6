//! Final artifact reference handed back to callers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the finished video ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoOutput {
    /// Durable URL returned by the upload service
    Uploaded { url: String },
    /// Upload disabled; the local file is exempt from cleanup
    LocalOnly { path: PathBuf },
}

impl VideoOutput {
    pub fn url(&self) -> Option<&str> {
        match self {
            VideoOutput::Uploaded { url } => Some(url),
            VideoOutput::LocalOnly { .. } => None,
        }
    }

    pub fn local_path(&self) -> Option<&PathBuf> {
        match self {
            VideoOutput::Uploaded { .. } => None,
            VideoOutput::LocalOnly { path } => Some(path),
        }
    }
}
