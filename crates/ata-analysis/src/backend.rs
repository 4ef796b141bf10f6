//! Backend traits for the four analysis operations.
//!
//! Implementations may be remote models, local heuristics or test doubles.
//! They report failures as [`AnalysisError`]; callers go through
//! [`crate::TextAnalyzer`], which never lets an error escape.

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::types::{ModerationVerdict, SentimentScore};

/// Condenses a block of text (one item per line) into a shorter summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Backend name used in logs.
    fn name(&self) -> &str;

    async fn summarize(&self, text: &str) -> Result<String, AnalysisError>;
}

/// Scores the tone of a piece of text.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &str;

    async fn score(&self, text: &str) -> Result<SentimentScore, AnalysisError>;
}

/// Decides whether a comment may be published.
#[async_trait]
pub trait Moderator: Send + Sync {
    fn name(&self) -> &str;

    async fn moderate(&self, text: &str) -> Result<ModerationVerdict, AnalysisError>;
}

/// Translates Portuguese text to English.
#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, text: &str) -> Result<String, AnalysisError>;
}
