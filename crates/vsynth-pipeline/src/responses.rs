//! Decoders for generation-service responses.
//!
//! Each accepted response shape has its own typed decoder. Shapes are tried
//! in a fixed order and every miss is recorded, so a failed decode says
//! exactly which shapes were attempted.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;

/// Key the language model is asked to return prompts under.
pub const PROMPT_LIST_KEY: &str = "image_prompts_per_sentence";

/// No known shape matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no known response shape matched (tried: {})", .tried.join("; "))]
pub struct DecodeError {
    pub tried: Vec<String>,
}

/// Either a flat list of prompts or a list of prompt lists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PromptEntries {
    Flat(Vec<String>),
    Nested(Vec<Vec<String>>),
}

impl PromptEntries {
    /// Nested lists contribute their first prompt; an empty inner list
    /// makes the whole value unusable.
    fn into_prompts(self) -> Option<Vec<String>> {
        match self {
            PromptEntries::Flat(prompts) => Some(prompts),
            PromptEntries::Nested(lists) => lists
                .into_iter()
                .map(|list| list.into_iter().next())
                .collect(),
        }
    }
}

fn embedded_list_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)\[\s*".*?"\s*(?:,\s*".*?"\s*)*\]"#).expect("valid prompt list pattern")
    })
}

/// Remove a surrounding Markdown code fence (```json ... ```), if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Decode the prompt list from a language-model response.
///
/// Tried in order: an object keyed by `image_prompts_per_sentence`, a bare
/// JSON list, then the first list literal of quoted strings embedded
/// anywhere in the text. The length is not checked here.
pub fn decode_prompt_list(text: &str) -> Result<Vec<String>, DecodeError> {
    let body = strip_code_fence(text);
    let mut tried = Vec::new();

    // Map only deserializes from a JSON object, never from a list
    match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(mut object) => match object.remove(PROMPT_LIST_KEY) {
            Some(value) => match PromptEntries::deserialize(value) {
                Ok(entries) => match entries.into_prompts() {
                    Some(prompts) => return Ok(prompts),
                    None => tried.push(format!("{PROMPT_LIST_KEY} object: empty nested list")),
                },
                Err(e) => tried.push(format!("{PROMPT_LIST_KEY} object: {e}")),
            },
            None => tried.push(format!("{PROMPT_LIST_KEY} object: key missing")),
        },
        Err(e) => tried.push(format!("{PROMPT_LIST_KEY} object: {e}")),
    }

    match serde_json::from_str::<PromptEntries>(body) {
        Ok(entries) => match entries.into_prompts() {
            Some(prompts) => return Ok(prompts),
            None => tried.push("bare list: empty nested list".to_string()),
        },
        Err(e) => tried.push(format!("bare list: {e}")),
    }

    match embedded_list_pattern().find(text) {
        Some(found) => match serde_json::from_str::<PromptEntries>(found.as_str()) {
            Ok(entries) => match entries.into_prompts() {
                Some(prompts) => return Ok(prompts),
                None => tried.push("embedded list: empty nested list".to_string()),
            },
            Err(e) => tried.push(format!("embedded list: {e}")),
        },
        None => tried.push("embedded list: no list literal found".to_string()),
    }

    Err(DecodeError { tried })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictResponse {
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedImagesResponse {
    generated_images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    image: Option<ImagePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagePayload {
    image_bytes: Option<String>,
}

/// Decode image buffers from an image-generation response.
///
/// Tried in order: `predictions[].bytesBase64Encoded`, then
/// `generatedImages[].image.imageBytes`. A shape that parses but carries no
/// image falls through to the next one. `Ok(vec![])` means a shape matched
/// but every image was filtered out.
pub fn decode_image_response(body: &Value) -> Result<Vec<Vec<u8>>, DecodeError> {
    let mut tried = Vec::new();
    let mut matched_empty = false;

    match PredictResponse::deserialize(body) {
        Ok(resp) => {
            let encoded = resp
                .predictions
                .into_iter()
                .filter_map(|p| p.bytes_base64_encoded);
            match decode_all(encoded) {
                Ok(images) if !images.is_empty() => return Ok(images),
                Ok(_) => matched_empty = true,
                Err(e) => tried.push(format!("predictions: {e}")),
            }
        }
        Err(e) => tried.push(format!("predictions: {e}")),
    }

    match GeneratedImagesResponse::deserialize(body) {
        Ok(resp) => {
            let encoded = resp
                .generated_images
                .into_iter()
                .filter_map(|g| g.image.and_then(|i| i.image_bytes));
            match decode_all(encoded) {
                Ok(images) if !images.is_empty() => return Ok(images),
                Ok(_) => matched_empty = true,
                Err(e) => tried.push(format!("generatedImages: {e}")),
            }
        }
        Err(e) => tried.push(format!("generatedImages: {e}")),
    }

    if matched_empty {
        Ok(Vec::new())
    } else {
        Err(DecodeError { tried })
    }
}

fn decode_all(encoded: impl Iterator<Item = String>) -> Result<Vec<Vec<u8>>, base64::DecodeError> {
    encoded.map(|s| BASE64.decode(s.trim())).collect()
}
