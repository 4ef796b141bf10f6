//! Reply composition for each intent.
//!
//! Handlers build HTML fragments (`<br>`, `<strong>`) for the chat panel.
//! Any handler that consults an analysis backend has a canned fallback built
//! from the static portal content, so a reply is always produced.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ata_analysis::TextAnalyzer;
use ata_core::config::ContentConfig;

use crate::parser::{strip_translation_trigger, Intent, IntentResult};

// =============================================================================
// Canned text
// =============================================================================

pub const NEWS_PREFIX: &str = "Aqui está um resumo das últimas notícias:<br><br>";

pub const EVENTS_PREFIX: &str = "Próximos eventos:<br><br>";

pub const TRANSLATION_PREFIX: &str = "Tradução para inglês:<br><br>";

pub const TRANSLATION_UNAVAILABLE: &str = "[tradução indisponível]";

pub const TRANSLATION_CLARIFICATION: &str = "Por favor, especifique o texto que deseja traduzir. \
     Exemplo: 'traduzir onde fica a biblioteca?'";

pub const HELP_TEXT: &str = "Posso ajudar com:<br><br>\
     • <strong>Notícias</strong>: Resumir últimas notícias<br>\
     • <strong>Eventos</strong>: Listar próximos eventos<br>\
     • <strong>Tradução</strong>: Traduzir textos para inglês<br>\
     • <strong>Dúvidas</strong>: Responder perguntas sobre a escola<br><br>\
     Experimente dizer: \"Quais as notícias de hoje?\" ou \"Traduzir biblioteca\"";

/// Filler replies for unmatched input. One is picked at random per reply.
pub const GENERIC_RESPONSES: [&str; 4] = [
    "Interessante! Posso te ajudar com informações sobre notícias, eventos ou outros assuntos da escola.",
    "Hmm, não tenho certeza se entendi completamente. Você pode reformular?",
    "Posso pesquisar isso para você. Enquanto isso, que tal dar uma olhada nas últimas notícias?",
    "Minhas capacidades incluem resumir notícias, listar eventos e responder perguntas sobre a escola.",
];

pub const EMPTY_INPUT_PROMPT: &str =
    "Não recebi nenhuma mensagem. Digite ou fale sua pergunta, ou diga \"ajuda\" para ver o que posso fazer.";

/// Clarification for over-long input.
pub fn too_long_prompt(max_chars: usize) -> String {
    format!(
        "Sua mensagem é muito longa. Por favor, resuma sua pergunta em até {} caracteres.",
        max_chars
    )
}

// =============================================================================
// ResponseGenerator
// =============================================================================

/// Builds assistant replies from the classified intent.
pub struct ResponseGenerator {
    analyzer: TextAnalyzer,
    content: ContentConfig,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for ResponseGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseGenerator")
            .field("analyzer", &self.analyzer)
            .field("headlines", &self.content.headlines.len())
            .field("events", &self.content.events.len())
            .finish()
    }
}

impl ResponseGenerator {
    /// `seed` makes the generic reply selection reproducible.
    pub fn new(analyzer: TextAnalyzer, content: ContentConfig, seed: Option<u64>) -> Self {
        Self {
            analyzer,
            content,
            rng: Mutex::new(make_rng(seed)),
        }
    }

    /// Replace the random source for generic replies.
    pub fn reseed(&self, seed: u64) {
        *self.rng.lock().unwrap_or_else(PoisonError::into_inner) = StdRng::seed_from_u64(seed);
    }

    /// Static portal content the handlers draw from.
    pub fn content(&self) -> &ContentConfig {
        &self.content
    }

    /// Dispatch to the handler for `intent`.
    pub async fn respond(&self, text: &str, intent: &IntentResult) -> String {
        match intent.category {
            Intent::News => self.news().await,
            Intent::Events => self.events(),
            Intent::Translation => self.translation(text).await,
            Intent::Help => self.help(),
            Intent::Generic => self.generic(),
        }
    }

    /// Summary of the current headlines, or the headlines themselves when the
    /// summarizer has nothing to offer.
    pub async fn news(&self) -> String {
        let joined = self.content.headlines.join("\n");
        let body = match self.analyzer.summarize(&joined).await {
            Some(summary) => summary.trim().replace('\n', "<br>"),
            None => self.headline_bullets(),
        };
        format!("{}{}", NEWS_PREFIX, body)
    }

    pub fn events(&self) -> String {
        let listing = self
            .content
            .events
            .iter()
            .map(|e| format!("<strong>{}:</strong> {} ({})", e.date, e.title, e.location))
            .collect::<Vec<_>>()
            .join("<br>");
        format!("{}{}", EVENTS_PREFIX, listing)
    }

    /// Translate whatever follows the trigger keyword. A bare trigger gets a
    /// clarification and never reaches the translator.
    pub async fn translation(&self, text: &str) -> String {
        let remainder = strip_translation_trigger(text);
        if remainder.is_empty() {
            return TRANSLATION_CLARIFICATION.to_string();
        }

        let translated = self
            .analyzer
            .translate(&remainder)
            .await
            .unwrap_or_else(|| TRANSLATION_UNAVAILABLE.to_string());
        format!(
            "{}\"{}\" → \"{}\"",
            TRANSLATION_PREFIX,
            remainder,
            translated.trim()
        )
    }

    pub fn help(&self) -> String {
        HELP_TEXT.to_string()
    }

    /// Uniformly random pick from [`GENERIC_RESPONSES`].
    pub fn generic(&self) -> String {
        let idx = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(0..GENERIC_RESPONSES.len());
        GENERIC_RESPONSES[idx].to_string()
    }

    // -- Private helpers --

    fn headline_bullets(&self) -> String {
        self.content
            .headlines
            .iter()
            .map(|h| format!("• {}", h))
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::IntentClassifier;
    use ata_core::config::AnalysisConfig;

    fn local(seed: Option<u64>) -> ResponseGenerator {
        ResponseGenerator::new(
            TextAnalyzer::local(&AnalysisConfig::default()),
            ContentConfig::default(),
            seed,
        )
    }

    fn offline() -> ResponseGenerator {
        ResponseGenerator::new(TextAnalyzer::offline(), ContentConfig::default(), Some(7))
    }

    // ---- News ----

    #[tokio::test]
    async fn test_news_uses_summary() {
        let reply = local(None).news().await;
        assert!(reply.starts_with(NEWS_PREFIX));
        assert!(reply.contains("• "));
        assert!(!reply.contains('\n'));
    }

    #[tokio::test]
    async fn test_news_falls_back_to_headlines() {
        let generator = offline();
        let reply = generator.news().await;
        let expected: Vec<String> = generator
            .content()
            .headlines
            .iter()
            .map(|h| format!("• {}", h))
            .collect();
        assert_eq!(reply, format!("{}{}", NEWS_PREFIX, expected.join("<br>")));
    }

    // ---- Events ----

    #[test]
    fn test_events_listing() {
        let reply = offline().events();
        assert!(reply.starts_with(EVENTS_PREFIX));
        assert!(reply.contains("<strong>15/06:</strong> Reunião de Pais (Auditório)"));
        assert_eq!(reply.matches("<strong>").count(), 3);
    }

    // ---- Translation ----

    #[tokio::test]
    async fn test_translation_reply() {
        let reply = local(None).translation("traduzir biblioteca").await;
        assert_eq!(
            reply,
            format!("{}\"biblioteca\" → \"library\"", TRANSLATION_PREFIX)
        );
    }

    #[tokio::test]
    async fn test_translation_bare_trigger_clarifies() {
        assert_eq!(
            local(None).translation("  Traduzir ").await,
            TRANSLATION_CLARIFICATION
        );
    }

    #[tokio::test]
    async fn test_translation_backend_failure_uses_placeholder() {
        let reply = offline().translation("translate escola").await;
        assert!(reply.contains("\"escola\" → \"[tradução indisponível]\""));
    }

    // ---- Help / Generic ----

    #[test]
    fn test_help_lists_capabilities() {
        let help = offline().help();
        for topic in ["Notícias", "Eventos", "Tradução", "Dúvidas"] {
            assert!(help.contains(topic));
        }
    }

    #[test]
    fn test_generic_is_member_of_set() {
        let generator = local(None);
        for _ in 0..20 {
            assert!(GENERIC_RESPONSES.contains(&generator.generic().as_str()));
        }
    }

    #[test]
    fn test_generic_is_reproducible_with_seed() {
        let a = local(Some(42));
        let b = local(Some(42));
        let picks_a: Vec<String> = (0..10).map(|_| a.generic()).collect();
        let picks_b: Vec<String> = (0..10).map(|_| b.generic()).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let generator = local(Some(1));
        let first: Vec<String> = (0..5).map(|_| generator.generic()).collect();
        generator.reseed(1);
        let again: Vec<String> = (0..5).map(|_| generator.generic()).collect();
        assert_eq!(first, again);
    }

    // ---- Dispatch ----

    #[tokio::test]
    async fn test_respond_dispatches_by_intent() {
        let generator = offline();
        let classifier = IntentClassifier::new();
        for (text, prefix) in [
            ("notícias?", NEWS_PREFIX),
            ("agenda", EVENTS_PREFIX),
            ("ajuda", "Posso ajudar com:"),
        ] {
            let reply = generator.respond(text, &classifier.classify(text)).await;
            assert!(reply.starts_with(prefix), "input: {}", text);
        }
    }

    #[test]
    fn test_too_long_prompt_mentions_limit() {
        assert!(too_long_prompt(2000).contains("2000"));
    }
}
