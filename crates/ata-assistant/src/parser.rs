//! Keyword-based intent classifier.
//!
//! Maps raw user input to one of five ordered categories. Categories are
//! checked in priority order (news, events, translation, help) and the first
//! category with any keyword present wins; unmatched input is `Generic`.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// =============================================================================
// Types
// =============================================================================

/// Purpose category of a user utterance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    News,
    Events,
    Translation,
    Help,
    Generic,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Intent::News => "news",
            Intent::Events => "events",
            Intent::Translation => "translation",
            Intent::Help => "help",
            Intent::Generic => "generic",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of classifying one input. Computed fresh per input, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    pub category: Intent,
    /// Lowercased keywords of the winning category found in the input.
    pub matched_keywords: BTreeSet<String>,
}

impl IntentResult {
    fn generic() -> Self {
        Self {
            category: Intent::Generic,
            matched_keywords: BTreeSet::new(),
        }
    }
}

// =============================================================================
// Compiled keyword rules (compiled once, reused across calls)
// =============================================================================

struct KeywordRule {
    intent: Intent,
    pattern: Regex,
}

/// Substring keywords per category, in priority order.
static KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::News, &["notícia", "noticia"]),
    (Intent::Events, &["evento", "agenda"]),
    (Intent::Translation, &["traduzir", "translate"]),
    (Intent::Help, &["ajuda", "help"]),
];

static RULES: LazyLock<Vec<KeywordRule>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|(intent, words)| {
            let alts: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
            KeywordRule {
                intent: *intent,
                pattern: Regex::new(&format!("(?i)(?:{})", alts.join("|")))
                    .expect("Invalid intent regex"),
            }
        })
        .collect()
});

static TRANSLATION_TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)traduzir|translate").expect("Invalid trigger regex"));

// =============================================================================
// IntentClassifier
// =============================================================================

/// Pure, synchronous keyword classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `text`. Never fails; unmatched input resolves to `Generic`.
    pub fn classify(&self, text: &str) -> IntentResult {
        for rule in RULES.iter() {
            let matched: BTreeSet<String> = rule
                .pattern
                .find_iter(text)
                .map(|m| m.as_str().to_lowercase())
                .collect();
            if !matched.is_empty() {
                return IntentResult {
                    category: rule.intent,
                    matched_keywords: matched,
                };
            }
        }
        IntentResult::generic()
    }
}

/// Remove every translation trigger keyword and trim what remains.
pub fn strip_translation_trigger(text: &str) -> String {
    TRANSLATION_TRIGGER.replace_all(text, "").trim().to_string()
}

// =============================================================================
// Tests
// =============================================================================
