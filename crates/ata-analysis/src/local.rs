//! Rule-based backends that run without any model.
//!
//! Good enough for development and for the offline portal; production
//! deployments swap them for remote backends behind the same traits.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use async_trait::async_trait;

use crate::backend::{Moderator, SentimentModel, Summarizer, Translator};
use crate::error::AnalysisError;
use crate::types::{ModerationVerdict, SentimentLabel, SentimentScore};

/// Lowercased alphanumeric tokens of `text`.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

// =============================================================================
// Sentiment
// =============================================================================

static POSITIVE_WORDS: &[&str] = &[
    "bom", "boa", "ótimo", "ótima", "excelente", "legal", "parabéns", "adorei", "gostei",
    "incrível", "maravilhoso", "feliz", "obrigado", "obrigada", "top", "sucesso", "lindo",
    "good", "great", "excellent", "love", "awesome", "nice", "happy", "thanks",
];

static NEGATIVE_WORDS: &[&str] = &[
    "ruim", "péssimo", "péssima", "horrível", "odiei", "chato", "triste", "terrível",
    "pior", "fraco", "problema", "decepcionante", "bad", "terrible", "awful", "hate",
    "worst", "sad", "boring",
];

/// Counts polarity words from a small Portuguese/English lexicon.
#[derive(Debug, Default, Clone)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of [`SentimentModel::score`].
    pub fn classify(&self, text: &str) -> Result<SentimentScore, AnalysisError> {
        let mut total = 0usize;
        let mut positive = 0usize;
        let mut negative = 0usize;
        for token in tokens(text) {
            total += 1;
            if POSITIVE_WORDS.contains(&token.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&token.as_str()) {
                negative += 1;
            }
        }

        if total == 0 {
            return Err(AnalysisError::EmptyPayload);
        }

        let hits = positive + negative;
        let label = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => SentimentLabel::Positive,
            std::cmp::Ordering::Less => SentimentLabel::Negative,
            std::cmp::Ordering::Equal => SentimentLabel::Neutral,
        };
        let margin = positive.abs_diff(negative) as f32;
        let confidence = 0.5 + 0.5 * margin / (hits as f32 + 1.0);

        Ok(SentimentScore::new(label, confidence))
    }
}

#[async_trait]
impl SentimentModel for LexiconSentiment {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn score(&self, text: &str) -> Result<SentimentScore, AnalysisError> {
        self.classify(text)
    }
}

// =============================================================================
// Moderation
// =============================================================================

/// Flags comments containing blocked terms.
#[derive(Debug, Clone)]
pub struct KeywordModerator {
    blocked: Vec<String>,
}

impl KeywordModerator {
    pub fn new(blocked: &[String]) -> Self {
        Self {
            blocked: blocked.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Synchronous core of [`Moderator::moderate`].
    pub fn check(&self, text: &str) -> ModerationVerdict {
        let flags: BTreeSet<String> = tokens(text)
            .filter(|t| self.blocked.contains(t))
            .map(|t| format!("insulto:{}", t))
            .collect();
        ModerationVerdict::from_flags(flags)
    }
}

#[async_trait]
impl Moderator for KeywordModerator {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn moderate(&self, text: &str) -> Result<ModerationVerdict, AnalysisError> {
        Ok(self.check(text))
    }
}

// =============================================================================
// Translation
// =============================================================================

static GLOSSARY: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("a", "the"),
        ("o", "the"),
        ("as", "the"),
        ("os", "the"),
        ("onde", "where"),
        ("fica", "is"),
        ("é", "is"),
        ("biblioteca", "library"),
        ("escola", "school"),
        ("aula", "class"),
        ("aulas", "classes"),
        ("professor", "teacher"),
        ("professora", "teacher"),
        ("aluno", "student"),
        ("alunos", "students"),
        ("prova", "exam"),
        ("notícia", "news"),
        ("notícias", "news"),
        ("evento", "event"),
        ("eventos", "events"),
        ("hoje", "today"),
        ("amanhã", "tomorrow"),
        ("bom", "good"),
        ("boa", "good"),
        ("dia", "day"),
        ("noite", "night"),
        ("obrigado", "thank you"),
        ("obrigada", "thank you"),
        ("olá", "hello"),
        ("feira", "fair"),
        ("ciências", "science"),
        ("jogos", "games"),
        ("internos", "internal"),
        ("de", "of"),
        ("da", "of the"),
        ("do", "of the"),
        ("e", "and"),
        ("quadra", "court"),
        ("reunião", "meeting"),
        ("pais", "parents"),
        ("secretaria", "office"),
        ("horário", "schedule"),
        ("cantina", "cafeteria"),
    ])
});

/// Word-by-word Portuguese to English glossary.
///
/// Unknown words are kept as-is; input with no known word is rejected so the
/// caller falls back instead of echoing the original back as a "translation".
#[derive(Debug, Default, Clone)]
pub struct GlossaryTranslator;

impl GlossaryTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of [`Translator::translate`].
    pub fn render(&self, text: &str) -> Result<String, AnalysisError> {
        let mut known = 0usize;
        let words: Vec<String> = text
            .split_whitespace()
            .map(|word| {
                let core_end = word
                    .char_indices()
                    .rev()
                    .find(|(_, c)| c.is_alphanumeric())
                    .map(|(i, c)| i + c.len_utf8())
                    .unwrap_or(0);
                let (core, tail) = word.split_at(core_end);
                match GLOSSARY.get(core.to_lowercase().as_str()) {
                    Some(english) => {
                        known += 1;
                        format!("{}{}", english, tail)
                    }
                    None => word.to_string(),
                }
            })
            .collect();

        if known == 0 {
            return Err(AnalysisError::Unsupported(format!(
                "no glossary entry for '{}'",
                text
            )));
        }
        Ok(words.join(" "))
    }
}

#[async_trait]
impl Translator for GlossaryTranslator {
    fn name(&self) -> &str {
        "glossary"
    }

    async fn translate(&self, text: &str) -> Result<String, AnalysisError> {
        self.render(text)
    }
}

// =============================================================================
// Offline
// =============================================================================

/// Backend that is never reachable. Every call fails.
#[derive(Debug, Default, Clone)]
pub struct OfflineBackend;

impl OfflineBackend {
    fn unavailable() -> AnalysisError {
        AnalysisError::Backend("backend offline".to_string())
    }
}

#[async_trait]
impl Summarizer for OfflineBackend {
    fn name(&self) -> &str {
        "offline"
    }

    async fn summarize(&self, _text: &str) -> Result<String, AnalysisError> {
        Err(Self::unavailable())
    }
}

#[async_trait]
impl SentimentModel for OfflineBackend {
    fn name(&self) -> &str {
        "offline"
    }

    async fn score(&self, _text: &str) -> Result<SentimentScore, AnalysisError> {
        Err(Self::unavailable())
    }
}

#[async_trait]
impl Moderator for OfflineBackend {
    fn name(&self) -> &str {
        "offline"
    }

    async fn moderate(&self, _text: &str) -> Result<ModerationVerdict, AnalysisError> {
        Err(Self::unavailable())
    }
}

#[async_trait]
impl Translator for OfflineBackend {
    fn name(&self) -> &str {
        "offline"
    }

    async fn translate(&self, _text: &str) -> Result<String, AnalysisError> {
        Err(Self::unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Sentiment ----

    #[test]
    fn test_sentiment_positive() {
        let s = LexiconSentiment::new().classify("Adorei a feira, ficou excelente!").unwrap();
        assert_eq!(s.sentiment, SentimentLabel::Positive);
        assert!(s.confidence > 0.5);
    }

    #[test]
    fn test_sentiment_negative() {
        let s = LexiconSentiment::new().classify("Que evento horrível e chato").unwrap();
        assert_eq!(s.sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_sentiment_neutral_without_hits() {
        let s = LexiconSentiment::new().classify("A reunião é amanhã").unwrap();
        assert_eq!(s.sentiment, SentimentLabel::Neutral);
        assert!((s.confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sentiment_tie_is_neutral() {
        let s = LexiconSentiment::new().classify("bom mas ruim").unwrap();
        assert_eq!(s.sentiment, SentimentLabel::Neutral);
    }

    #[test]
    fn test_sentiment_is_case_insensitive() {
        let s = LexiconSentiment::new().classify("ÓTIMO").unwrap();
        assert_eq!(s.sentiment, SentimentLabel::Positive);
    }

    #[test]
    fn test_sentiment_empty_is_error() {
        assert!(matches!(
            LexiconSentiment::new().classify("  ?! "),
            Err(AnalysisError::EmptyPayload)
        ));
    }

    #[test]
    fn test_sentiment_confidence_in_range() {
        let s = LexiconSentiment::new()
            .classify("bom bom bom bom bom bom bom bom")
            .unwrap();
        assert!(s.confidence <= 1.0);
        assert!(s.confidence >= 0.0);
    }

    // ---- Moderation ----

    fn moderator() -> KeywordModerator {
        KeywordModerator::new(&["idiota".to_string(), "Lixo".to_string()])
    }

    #[test]
    fn test_moderation_clean_comment_approved() {
        let v = moderator().check("Parabéns aos alunos!");
        assert!(v.approved);
        assert!(v.flags.is_empty());
    }

    #[test]
    fn test_moderation_flags_blocked_term() {
        let v = moderator().check("Que texto lixo, autor IDIOTA");
        assert!(!v.approved);
        assert!(v.flags.contains("insulto:lixo"));
        assert!(v.flags.contains("insulto:idiota"));
    }

    #[test]
    fn test_moderation_matches_whole_words_only() {
        let v = moderator().check("lixeira nova no pátio");
        assert!(v.approved);
    }

    #[test]
    fn test_moderation_repeated_term_single_flag() {
        let v = moderator().check("lixo lixo lixo");
        assert_eq!(v.flags.len(), 1);
    }

    // ---- Translation ----

    #[test]
    fn test_translate_single_word() {
        assert_eq!(GlossaryTranslator::new().render("biblioteca").unwrap(), "library");
    }

    #[test]
    fn test_translate_sentence_keeps_punctuation() {
        let out = GlossaryTranslator::new()
            .render("onde fica a biblioteca?")
            .unwrap();
        assert_eq!(out, "where is the library?");
    }

    #[test]
    fn test_translate_keeps_unknown_words() {
        let out = GlossaryTranslator::new().render("biblioteca Monteiro").unwrap();
        assert_eq!(out, "library Monteiro");
    }

    #[test]
    fn test_translate_rejects_unknown_text() {
        assert!(matches!(
            GlossaryTranslator::new().render("xyzzy"),
            Err(AnalysisError::Unsupported(_))
        ));
    }

    // ---- Offline ----

    #[tokio::test]
    async fn test_offline_backend_always_fails() {
        let b = OfflineBackend;
        assert!(Summarizer::summarize(&b, "x").await.is_err());
        assert!(SentimentModel::score(&b, "x").await.is_err());
        assert!(Moderator::moderate(&b, "x").await.is_err());
        assert!(Translator::translate(&b, "x").await.is_err());
        assert_eq!(Summarizer::name(&b), "offline");
    }
}
