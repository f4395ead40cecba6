//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; the binary that hosts the
//! pipeline decides whether a recorder is installed.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const RUNS_STARTED_TOTAL: &str = "vsynth_runs_started_total";
    pub const RUNS_COMPLETED_TOTAL: &str = "vsynth_runs_completed_total";
    pub const RUNS_FAILED_TOTAL: &str = "vsynth_runs_failed_total";
    pub const RUN_DURATION_SECONDS: &str = "vsynth_run_duration_seconds";
    pub const PROMPT_ALIGNMENT_RETRIES_TOTAL: &str = "vsynth_prompt_alignment_retries_total";
    pub const IMAGE_FAILURES_TOTAL: &str = "vsynth_image_failures_total";
    pub const SUMMARY_FALLBACKS_TOTAL: &str = "vsynth_summary_fallbacks_total";
    pub const UNITS_RENDERED_TOTAL: &str = "vsynth_units_rendered_total";
    pub const RESOURCES_RELEASED_TOTAL: &str = "vsynth_resources_released_total";
}

pub fn record_run_started() {
    counter!(names::RUNS_STARTED_TOTAL).increment(1);
}

pub fn record_run_completed(mode: &str, duration_secs: f64) {
    let labels = [("mode", mode.to_string())];
    counter!(names::RUNS_COMPLETED_TOTAL, &labels).increment(1);
    histogram!(names::RUN_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_run_failed(stage: &str) {
    let labels = [("stage", stage.to_string())];
    counter!(names::RUNS_FAILED_TOTAL, &labels).increment(1);
}

pub fn record_alignment_retry() {
    counter!(names::PROMPT_ALIGNMENT_RETRIES_TOTAL).increment(1);
}

pub fn record_image_failure() {
    counter!(names::IMAGE_FAILURES_TOTAL).increment(1);
}

pub fn record_summary_fallback() {
    counter!(names::SUMMARY_FALLBACKS_TOTAL).increment(1);
}

pub fn record_units_rendered(count: usize) {
    counter!(names::UNITS_RENDERED_TOTAL).increment(count as u64);
}

pub fn record_resources_released(count: usize) {
    counter!(names::RESOURCES_RELEASED_TOTAL).increment(count as u64);
}
