//! Handles to transient files created during a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of transient file, used for naming and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Image,
    Audio,
    Caption,
    CaptionText,
    Clip,
    ConcatList,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Audio => "audio",
            ResourceKind::Caption => "caption",
            ResourceKind::CaptionText => "caption_text",
            ResourceKind::Clip => "clip",
            ResourceKind::ConcatList => "concat_list",
            ResourceKind::Video => "video",
        }
    }
}

/// Reference to a transient file on shared scratch storage.
///
/// Handles are plain references; the tracker that issued one owns the file
/// and deletes it when the run terminates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle {
    path: PathBuf,
    kind: ResourceKind,
}

impl ResourceHandle {
    pub fn new(path: impl Into<PathBuf>, kind: ResourceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for ResourceHandle {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
