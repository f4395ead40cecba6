//! Pipeline run identity and lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form used in transient file names.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(12);
        &self.0[..end]
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a pipeline run.
///
/// Runs move strictly forward through
/// `Received → Summarized → Segmented → PromptsAligned → UnitsComposed →
/// Assembled → (Uploaded | LocalOnly) → Terminated`, and may enter `Failed`
/// from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Received,
    Summarized,
    Segmented,
    PromptsAligned,
    UnitsComposed,
    Assembled,
    Uploaded,
    LocalOnly,
    Terminated,
    Failed,
}

/// Rejected state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid run transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: RunState,
    pub to: RunState,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Received => "received",
            RunState::Summarized => "summarized",
            RunState::Segmented => "segmented",
            RunState::PromptsAligned => "prompts_aligned",
            RunState::UnitsComposed => "units_composed",
            RunState::Assembled => "assembled",
            RunState::Uploaded => "uploaded",
            RunState::LocalOnly => "local_only",
            RunState::Terminated => "terminated",
            RunState::Failed => "failed",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Terminated | RunState::Failed)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;

        if self.is_terminal() {
            return false;
        }
        if next == Failed {
            return true;
        }
        matches!(
            (self, next),
            (Received, Summarized)
                | (Summarized, Segmented)
                | (Segmented, PromptsAligned)
                | (PromptsAligned, UnitsComposed)
                | (UnitsComposed, Assembled)
                | (Assembled, Uploaded)
                | (Assembled, LocalOnly)
                | (Uploaded, Terminated)
                | (LocalOnly, Terminated)
        )
    }

    /// Validate and return the successor state.
    pub fn transition(self, next: RunState) -> Result<RunState, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError { from: self, to: next })
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
