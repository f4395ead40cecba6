//! Object key layout.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

/// Key for an uploaded video: `{prefix}/{yyyy}/{mm}/{id}.mp4`.
pub fn video_key(prefix: &str, at: DateTime<Utc>, id: Uuid) -> String {
    let prefix = prefix.trim_matches('/');
    let tail = format!("{:04}/{:02}/{}.mp4", at.year(), at.month(), id.simple());
    if prefix.is_empty() {
        tail
    } else {
        format!("{prefix}/{tail}")
    }
}
