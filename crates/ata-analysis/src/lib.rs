//! Text-analysis adapters for the A.T.A assistant.
//!
//! Defines the contract the engine expects from the summarization,
//! sentiment, moderation and translation backends, a facade that degrades
//! every operation to a safe default on failure, and lightweight local
//! backends that run without any model.

pub mod analyzer;
pub mod backend;
pub mod error;
pub mod local;
pub mod summarizer;
pub mod types;

pub use analyzer::TextAnalyzer;
pub use backend::{Moderator, SentimentModel, Summarizer, Translator};
pub use error::AnalysisError;
pub use local::{GlossaryTranslator, KeywordModerator, LexiconSentiment, OfflineBackend};
pub use summarizer::ExtractiveSummarizer;
pub use types::{
    AnalysisKind, AnalysisRequest, AnalysisResponse, ModerationVerdict, SentimentLabel,
    SentimentScore,
};
