//! Sentence segmentation.

use vsynth_models::NarrationUnit;

/// Split a script into narration units.
///
/// Whitespace runs collapse to single spaces, then the text breaks after
/// `.`, `!` or `?` when followed by whitespace. Empty or whitespace-only
/// input yields no units.
pub fn segment(script: &str) -> Vec<NarrationUnit> {
    let words: Vec<&str> = script.split_whitespace().collect();
    let mut sentences = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in words {
        current.push(word);
        if word.ends_with(['.', '!', '?']) {
            sentences.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        sentences.push(current.join(" "));
    }

    sentences
        .into_iter()
        .enumerate()
        .map(|(index, text)| NarrationUnit::new(index, text))
        .collect()
}
