//! Even time slicing of a unit's duration window.

use serde::{Deserialize, Serialize};

/// A half-open interval `[start, start + duration)` inside a unit's window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSlice {
    /// Offset from the start of the unit, in seconds
    pub start: f64,
    /// Length of the slice, in seconds
    pub duration: f64,
}

impl TimeSlice {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Split `[0, total)` into `count` contiguous equal slices.
///
/// Slice `i` starts at `i * total / count`. The last slice ends exactly at
/// `total`, so durations always sum to `total` and neighbouring slices
/// share their boundary. Returns an empty vec when `count` is zero.
pub fn slice_evenly(total: f64, count: usize) -> Vec<TimeSlice> {
    if count == 0 {
        return Vec::new();
    }

    let per = total / count as f64;
    (0..count)
        .map(|i| {
            let start = per * i as f64;
            let duration = if i + 1 == count { total - start } else { per };
            TimeSlice { start, duration }
        })
        .collect()
}
