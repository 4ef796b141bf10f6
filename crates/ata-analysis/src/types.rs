//! Request and response shapes exchanged with the analysis backends.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Sentiment
// =============================================================================

/// Overall tone of a piece of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

/// Sentiment classification with a confidence in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub sentiment: SentimentLabel,
    pub confidence: f32,
}

impl SentimentScore {
    pub fn new(sentiment: SentimentLabel, confidence: f32) -> Self {
        Self {
            sentiment,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Value reported when the backend fails: neutral with zero confidence.
    pub fn fallback() -> Self {
        Self {
            sentiment: SentimentLabel::Neutral,
            confidence: 0.0,
        }
    }
}

// =============================================================================
// Moderation
// =============================================================================

/// Moderation outcome for a comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub approved: bool,
    pub flags: BTreeSet<String>,
}

impl ModerationVerdict {
    /// Value reported when the backend fails: approved with no flags.
    pub fn permissive() -> Self {
        Self {
            approved: true,
            flags: BTreeSet::new(),
        }
    }

    /// A verdict derived from flags: approved only when nothing was flagged.
    pub fn from_flags(flags: BTreeSet<String>) -> Self {
        Self {
            approved: flags.is_empty(),
            flags,
        }
    }
}

impl Default for ModerationVerdict {
    fn default() -> Self {
        Self::permissive()
    }
}

// =============================================================================
// Opaque request / response pair
// =============================================================================

/// The four analysis operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Summarize,
    Sentiment,
    Moderate,
    Translate,
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::Summarize => write!(f, "summarize"),
            AnalysisKind::Sentiment => write!(f, "sentiment"),
            AnalysisKind::Moderate => write!(f, "moderate"),
            AnalysisKind::Translate => write!(f, "translate"),
        }
    }
}

/// A single request to one of the analysis backends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub kind: AnalysisKind,
    pub text: String,
}

impl AnalysisRequest {
    pub fn new(kind: AnalysisKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Backend-specific response payload.
///
/// Summary and translation carry `None` when the backend failed; sentiment
/// and moderation always carry a value because they have defined defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResponse {
    Summary { text: Option<String> },
    Sentiment(SentimentScore),
    Moderation(ModerationVerdict),
    Translation { text: Option<String> },
}

impl AnalysisResponse {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResponse::Summary { .. } => AnalysisKind::Summarize,
            AnalysisResponse::Sentiment(_) => AnalysisKind::Sentiment,
            AnalysisResponse::Moderation(_) => AnalysisKind::Moderate,
            AnalysisResponse::Translation { .. } => AnalysisKind::Translate,
        }
    }
}
