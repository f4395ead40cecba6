//! Prompt aligner: one image description per narration unit.
//!
//! The whole request is re-issued on any failure. Partial re-alignment is
//! not attempted.

use serde_json::json;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use vsynth_models::{ImagePrompt, NarrationUnit};

use crate::error::{PipelineError, PipelineResult};
use crate::metrics;
use crate::responses::{decode_prompt_list, DecodeError};
use crate::retry::{retry_async, RetryConfig, RetryResult};
use crate::services::{LanguageModel, ServiceError};

const ALIGNMENT_INSTRUCTION: &str = "You will be given a list of sentences from a script. For EACH sentence, \
produce EXACTLY ONE vivid, concrete image prompt that best visualizes that sentence. Return ONLY JSON in \
the form:\n\n{\n  \"image_prompts_per_sentence\": [\n    \"prompt for sentence 1\",\n    \"prompt for \
sentence 2\",\n    ...\n  ]\n}\n\n- The number of prompts MUST equal the number of input sentences.\n\
- Keep the same order as the provided sentences.\n- Do NOT include any other keys or commentary.\n";

/// Why one alignment attempt failed.
#[derive(Debug)]
enum AttemptError {
    Service(ServiceError),
    Decode(DecodeError),
    Mismatch { received: usize },
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Service(e) => write!(f, "{e}"),
            AttemptError::Decode(e) => write!(f, "{e}"),
            AttemptError::Mismatch { received } => write!(f, "received {received} prompts"),
        }
    }
}

/// Build the request text for `units`. Non-ASCII text is kept as is.
pub fn alignment_request(units: &[NarrationUnit]) -> String {
    let sentences: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
    let payload = json!({ "sentences": sentences });
    format!("{ALIGNMENT_INSTRUCTION}\nInput (JSON):\n{payload}")
}

pub struct PromptAligner {
    llm: Arc<dyn LanguageModel>,
    retry: RetryConfig,
}

impl PromptAligner {
    /// `attempts` is the total request budget, including the first.
    pub fn new(llm: Arc<dyn LanguageModel>, attempts: u32, retry_delay: Duration) -> Self {
        Self {
            llm,
            retry: RetryConfig::new("prompt_alignment")
                .with_total_attempts(attempts.max(1))
                .with_base_delay(retry_delay),
        }
    }

    /// Request prompts for every unit, pairing `prompts[i]` with `units[i]`.
    ///
    /// A count mismatch is never truncated or padded.
    pub async fn align(&self, units: &[NarrationUnit]) -> PipelineResult<Vec<ImagePrompt>> {
        let expected = units.len();
        let request = alignment_request(units);

        let result = retry_async(&self.retry, |attempt| {
            let request = &request;
            async move {
                if attempt > 1 {
                    metrics::record_alignment_retry();
                    info!(attempt, expected, "Re-requesting image prompts");
                }

                let text = self.llm.generate(request).await.map_err(AttemptError::Service)?;
                let prompts = decode_prompt_list(&text).map_err(AttemptError::Decode)?;
                if prompts.len() != expected {
                    warn!(attempt, expected, received = prompts.len(), "Prompt count mismatch");
                    return Err(AttemptError::Mismatch {
                        received: prompts.len(),
                    });
                }
                Ok(prompts)
            }
        })
        .await;

        match result {
            RetryResult::Success(prompts) => {
                debug!(count = prompts.len(), "Prompts aligned");
                Ok(prompts
                    .into_iter()
                    .zip(units)
                    .map(|(description, unit)| ImagePrompt {
                        unit_index: unit.index,
                        description,
                    })
                    .collect())
            }
            RetryResult::Failed {
                error: AttemptError::Mismatch { received },
                attempts,
            } => Err(PipelineError::Alignment {
                expected,
                received,
                attempts,
            }),
            RetryResult::Failed { error, attempts } => Err(PipelineError::PromptGeneration {
                attempts,
                reason: error.to_string(),
            }),
        }
    }
}
