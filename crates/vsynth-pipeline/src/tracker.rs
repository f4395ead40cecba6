//! Per-run transient resource tracking.
//!
//! Every transient file a run creates is registered here at creation time.
//! The controller calls [`ResourceTracker::release_all`] once on every exit
//! path; `Drop` removes anything still tracked if a run unwinds early.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};
use vsynth_models::{ResourceHandle, ResourceKind, RunId};

#[derive(Debug, Default)]
struct TrackerState {
    /// Handles not yet released
    live: Vec<ResourceHandle>,
    /// Every handle ever issued, for post-run verification
    issued: Vec<ResourceHandle>,
    /// Paths handed to the caller; never deleted
    exempt: HashSet<PathBuf>,
    next_seq: u64,
}

/// Owner of every transient file created during one run.
///
/// Names are unique per run, unit and sequence number, so concurrent runs
/// can share one scratch directory.
#[derive(Debug)]
pub struct ResourceTracker {
    work_dir: PathBuf,
    run_tag: String,
    state: Mutex<TrackerState>,
}

impl ResourceTracker {
    /// Create a tracker rooted at `work_dir`, creating the directory.
    pub fn new(work_dir: impl Into<PathBuf>, run_id: &RunId) -> std::io::Result<Self> {
        let work_dir = work_dir.into();
        std::fs::create_dir_all(&work_dir)?;
        Ok(Self {
            work_dir,
            run_tag: run_id.short().to_string(),
            state: Mutex::new(TrackerState::default()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Reserve and register a unique path. Nothing is written.
    ///
    /// `label` carries the unit/chunk position, e.g. `u3` or `u3-c1`.
    pub fn allocate(&self, kind: ResourceKind, label: &str, ext: &str) -> ResourceHandle {
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;

        let name = if label.is_empty() {
            format!("{}-{}-{:03}.{}", self.run_tag, kind.as_str(), seq, ext)
        } else {
            format!("{}-{}-{}-{:03}.{}", self.run_tag, label, kind.as_str(), seq, ext)
        };
        let handle = ResourceHandle::new(self.work_dir.join(name), kind);
        state.live.push(handle.clone());
        state.issued.push(handle.clone());
        handle
    }

    /// Allocate a path and write `bytes` to it.
    ///
    /// The handle is registered before writing, so a failed write still
    /// gets cleaned up.
    pub async fn write(&self, kind: ResourceKind, label: &str, ext: &str, bytes: &[u8]) -> std::io::Result<ResourceHandle> {
        let handle = self.allocate(kind, label, ext);
        tokio::fs::write(handle.path(), bytes).await?;
        Ok(handle)
    }

    /// Keep `handle` on disk through cleanup; its path now belongs to the caller.
    pub fn exempt(&self, handle: &ResourceHandle) {
        let mut state = self.lock();
        state.exempt.insert(handle.path().to_path_buf());
        state.live.retain(|h| h != handle);
    }

    /// Delete every tracked, non-exempt file. Returns how many were removed.
    ///
    /// Safe to call more than once; later calls find nothing to do.
    pub async fn release_all(&self) -> usize {
        let handles = std::mem::take(&mut self.lock().live);
        let mut removed = 0;

        for handle in handles {
            match tokio::fs::remove_file(handle.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %handle, error = %e, "Failed to remove transient file"),
            }
        }

        debug!(run = %self.run_tag, removed, "Released transient resources");
        removed
    }

    /// Handles not yet released.
    pub fn live(&self) -> Vec<ResourceHandle> {
        self.lock().live.clone()
    }

    /// Every handle issued during the run.
    pub fn issued(&self) -> Vec<ResourceHandle> {
        self.lock().issued.clone()
    }

    /// Issued, non-exempt files that still exist on disk.
    pub fn remaining_on_disk(&self) -> Vec<PathBuf> {
        let state = self.lock();
        state
            .issued
            .iter()
            .map(|h| h.path().to_path_buf())
            .filter(|p| !state.exempt.contains(p) && p.exists())
            .collect()
    }
}

impl Drop for ResourceTracker {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        for handle in state.live.drain(..) {
            if let Err(e) = std::fs::remove_file(handle.path()) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %handle, error = %e, "Failed to remove transient file on drop");
                }
            }
        }
    }
}
