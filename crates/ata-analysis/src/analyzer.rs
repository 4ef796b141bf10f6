//! Facade over the four analysis backends.
//!
//! Every call is bounded by a timeout and every failure collapses into the
//! operation's safe default:
//! - summarize / translate: `None`, so the caller can build a canned reply
//! - sentiment: neutral with zero confidence
//! - moderation: approved with no flags

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ata_core::config::AnalysisConfig;

use crate::backend::{Moderator, SentimentModel, Summarizer, Translator};
use crate::error::AnalysisError;
use crate::local::{GlossaryTranslator, KeywordModerator, LexiconSentiment, OfflineBackend};
use crate::summarizer::ExtractiveSummarizer;
use crate::types::{
    AnalysisKind, AnalysisRequest, AnalysisResponse, ModerationVerdict, SentimentScore,
};

/// Uniform, never-failing entry point to the analysis backends.
#[derive(Clone)]
pub struct TextAnalyzer {
    summarizer: Arc<dyn Summarizer>,
    sentiment: Arc<dyn SentimentModel>,
    moderator: Arc<dyn Moderator>,
    translator: Arc<dyn Translator>,
    timeout: Duration,
}

impl std::fmt::Debug for TextAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextAnalyzer")
            .field("summarizer", &self.summarizer.name())
            .field("sentiment", &self.sentiment.name())
            .field("moderator", &self.moderator.name())
            .field("translator", &self.translator.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TextAnalyzer {
    /// Default upper bound on a single backend call.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create an analyzer from explicit backends.
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        sentiment: Arc<dyn SentimentModel>,
        moderator: Arc<dyn Moderator>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            summarizer,
            sentiment,
            moderator,
            translator,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Analyzer backed by the local rule-based backends.
    pub fn local(config: &AnalysisConfig) -> Self {
        Self::new(
            Arc::new(ExtractiveSummarizer::default()),
            Arc::new(LexiconSentiment::new()),
            Arc::new(KeywordModerator::new(&config.blocked_terms)),
            Arc::new(GlossaryTranslator::new()),
        )
        .with_timeout(Duration::from_millis(config.timeout_ms))
    }

    /// Analyzer whose backends are all unreachable.
    pub fn offline() -> Self {
        let backend = Arc::new(OfflineBackend);
        Self::new(backend.clone(), backend.clone(), backend.clone(), backend)
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Summarize newline-separated items. `None` when the backend fails or
    /// returns only whitespace.
    pub async fn summarize(&self, text: &str) -> Option<String> {
        let result = self
            .guarded(
                AnalysisKind::Summarize,
                self.summarizer.name(),
                self.summarizer.summarize(text),
            )
            .await;
        non_blank(result)
    }

    /// Score the tone of `text`. Neutral with zero confidence on failure.
    pub async fn analyze_sentiment(&self, text: &str) -> SentimentScore {
        let result = self
            .guarded(
                AnalysisKind::Sentiment,
                self.sentiment.name(),
                self.sentiment.score(text),
            )
            .await
            .and_then(|score| {
                if score.confidence.is_finite() {
                    Ok(SentimentScore::new(score.sentiment, score.confidence))
                } else {
                    Err(AnalysisError::EmptyPayload)
                }
            });

        match result {
            Ok(score) => score,
            Err(_) => SentimentScore::fallback(),
        }
    }

    /// Moderate a comment. Approved with no flags on failure.
    pub async fn moderate(&self, text: &str) -> ModerationVerdict {
        self.guarded(
            AnalysisKind::Moderate,
            self.moderator.name(),
            self.moderator.moderate(text),
        )
        .await
        .unwrap_or_else(|_| ModerationVerdict::permissive())
    }

    /// Translate `text` to English. `None` when the backend fails or returns
    /// only whitespace.
    pub async fn translate(&self, text: &str) -> Option<String> {
        let result = self
            .guarded(
                AnalysisKind::Translate,
                self.translator.name(),
                self.translator.translate(text),
            )
            .await;
        non_blank(result)
    }

    /// Dispatch an opaque request to the matching operation.
    pub async fn request(&self, request: AnalysisRequest) -> AnalysisResponse {
        match request.kind {
            AnalysisKind::Summarize => AnalysisResponse::Summary {
                text: self.summarize(&request.text).await,
            },
            AnalysisKind::Sentiment => {
                AnalysisResponse::Sentiment(self.analyze_sentiment(&request.text).await)
            }
            AnalysisKind::Moderate => {
                AnalysisResponse::Moderation(self.moderate(&request.text).await)
            }
            AnalysisKind::Translate => AnalysisResponse::Translation {
                text: self.translate(&request.text).await,
            },
        }
    }

    // -- Private helpers --

    /// Run a backend call under the timeout, logging any failure.
    async fn guarded<T, F>(
        &self,
        kind: AnalysisKind,
        backend: &str,
        call: F,
    ) -> Result<T, AnalysisError>
    where
        F: Future<Output = Result<T, AnalysisError>>,
    {
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(inner) => inner,
            Err(_) => Err(AnalysisError::Timeout(self.timeout.as_millis() as u64)),
        };

        match &result {
            Ok(_) => tracing::debug!(operation = %kind, backend, "Analysis call succeeded"),
            Err(e) => tracing::warn!(
                operation = %kind,
                backend,
                error = %e,
                "Analysis call failed, using safe default"
            ),
        }
        result
    }
}

fn non_blank(result: Result<String, AnalysisError>) -> Option<String> {
    result.ok().filter(|s| !s.trim().is_empty())
}
