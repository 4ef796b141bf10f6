//! Advisory analysis for the comment form.
//!
//! The comment flow only ever sees sentiment and moderation; both degrade to
//! permissive defaults, so a backend outage never blocks a reader from posting.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ata_analysis::SentimentLabel;

use crate::orchestrator::Assistant;

pub const REJECTED_NOTICE: &str =
    "Seu comentário contém conteúdo inapropriado. Por favor, revise.";

pub const ACCEPTED_NOTICE: &str = "Comentário enviado para moderação!";

/// Tone shown next to a comment draft as the reader types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentIndicator {
    pub sentiment: SentimentLabel,
    /// Confidence as a rounded percentage.
    pub percent: u8,
}

impl fmt::Display for SentimentIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tom: {} ({}%)", self.sentiment, self.percent)
    }
}

/// Whether a submitted comment goes on to moderation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentDecision {
    Accepted,
    Rejected { flags: BTreeSet<String> },
}

impl CommentDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CommentDecision::Accepted)
    }

    /// Notice shown to the reader after submitting.
    pub fn notice(&self) -> &'static str {
        match self {
            CommentDecision::Accepted => ACCEPTED_NOTICE,
            CommentDecision::Rejected { .. } => REJECTED_NOTICE,
        }
    }
}

/// Gate between the comment form and the assistant's analysis operations.
#[derive(Debug, Clone)]
pub struct CommentGate {
    assistant: Arc<Assistant>,
}

impl CommentGate {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }

    pub async fn indicator(&self, draft: &str) -> SentimentIndicator {
        let score = self.assistant.analyze_sentiment(draft).await;
        SentimentIndicator {
            sentiment: score.sentiment,
            percent: (score.confidence.clamp(0.0, 1.0) * 100.0).round() as u8,
        }
    }

    pub async fn review(&self, comment: &str) -> CommentDecision {
        let verdict = self.assistant.moderate(comment).await;
        if verdict.approved {
            CommentDecision::Accepted
        } else {
            tracing::info!(flags = ?verdict.flags, "Comment rejected by moderation");
            CommentDecision::Rejected {
                flags: verdict.flags,
            }
        }
    }
}
