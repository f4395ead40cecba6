//! Narration script summarizer.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::metrics;
use crate::services::LanguageModel;

const SUMMARY_INSTRUCTION: &str = "Summarize the following text into a concise, coherent script suitable \
for a short narration video. Preserve key information, keep the original language, and prefer clear \
and short sentences. Return ONLY the summarized script as plain text without any headings or labels.\n\nText:\n";

/// Condenses input into a narration-ready script.
///
/// Never fails: a service error or a too-short summary returns the input
/// unchanged.
pub struct Summarizer {
    llm: Arc<dyn LanguageModel>,
    min_chars: usize,
    enabled: bool,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LanguageModel>, min_chars: usize) -> Self {
        Self {
            llm,
            min_chars,
            enabled: true,
        }
    }

    /// Skip the service and pass input through.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub async fn summarize(&self, text: &str) -> String {
        // Nothing to condense; keeps empty input free of external calls
        if !self.enabled || text.trim().is_empty() {
            return text.to_string();
        }

        let prompt = format!("{SUMMARY_INSTRUCTION}{text}");
        match self.llm.generate(&prompt).await {
            Ok(summary) => {
                let summary = summary.trim();
                if summary.chars().count() >= self.min_chars {
                    debug!(input_chars = text.len(), summary_chars = summary.len(), "Using summary");
                    return summary.to_string();
                }
                debug!(summary_chars = summary.chars().count(), "Summary too short, using input");
            }
            Err(e) => warn!(error = %e, "Summarization failed, using input"),
        }

        metrics::record_summary_fallback();
        text.to_string()
    }
}
