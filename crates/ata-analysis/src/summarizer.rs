//! Extractive summarizer used when no summarization model is configured.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::backend::Summarizer;
use crate::error::AnalysisError;

/// Picks the most informative sentences of the input and returns them as
/// bullet lines, in the order they appeared.
pub struct ExtractiveSummarizer {
    max_points: usize,
}

impl ExtractiveSummarizer {
    /// Create a summarizer that keeps at most `max_points` sentences.
    pub fn new(max_points: usize) -> Self {
        Self { max_points }
    }

    /// Synchronous core of [`Summarizer::summarize`].
    pub fn extract(&self, text: &str) -> Result<String, AnalysisError> {
        let sentences: Vec<&str> = text
            .lines()
            .flat_map(split_sentences)
            .map(str::trim)
            .filter(|s| s.chars().count() > 10)
            .collect();

        if sentences.is_empty() || self.max_points == 0 {
            return Err(AnalysisError::EmptyPayload);
        }

        let picked = rank_sentences(&sentences, self.max_points);
        Ok(picked
            .iter()
            .map(|s| format!("• {}", s))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(3)
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn summarize(&self, text: &str) -> Result<String, AnalysisError> {
        self.extract(text)
    }
}

/// Simple sentence splitter on `.` `!` `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, c) in text.char_indices() {
        if (c == '.' || c == '!' || c == '?') && i + 1 < text.len() {
            let next = bytes.get(i + 1).copied().unwrap_or(0);
            if next == b' ' || next == b'\n' {
                result.push(&text[start..=i]);
                start = i + 1;
            }
        }
    }
    if start < text.len() {
        result.push(&text[start..]);
    }
    result
}

/// Keep the `top_k` highest scoring sentences (unique terms * sqrt(total terms)),
/// returned in their original order.
fn rank_sentences<'a>(sentences: &[&'a str], top_k: usize) -> Vec<&'a str> {
    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(idx, sent)| {
            let words: Vec<String> = sent.split_whitespace().map(str::to_lowercase).collect();
            let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
            (idx, (unique.len() as f64) * (words.len() as f64).sqrt())
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut keep: Vec<usize> = scored.into_iter().take(top_k).map(|(idx, _)| idx).collect();
    keep.sort_unstable();
    keep.into_iter().map(|idx| sentences[idx]).collect()
}
