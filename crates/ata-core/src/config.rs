use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::{CatalogEntry, SchoolEvent};

/// Top-level configuration for the A.T.A assistant.
///
/// Loaded from `~/.ata/config.toml` by default. Each section corresponds
/// to one part of the engine or to the static portal content it serves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

impl AtaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AtaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Conversational engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Message seeded into the timeline every time the assistant is activated.
    pub greeting: String,
    /// System notice appended when voice capture starts.
    pub listening_prompt: String,
    /// Simulated response latency in milliseconds.
    pub typing_delay_ms: u64,
    /// Maximum accepted input length in characters.
    pub max_message_length: usize,
    /// Seed for the filler-response picker. Random when unset.
    pub rng_seed: Option<u64>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: "Olá! Sou o assistente de IA do Jornal A.T.A. Como posso ajudar?".to_string(),
            listening_prompt: "Ouvindo... (fale agora)".to_string(),
            typing_delay_ms: 1500,
            max_message_length: 2000,
            rng_seed: None,
        }
    }
}

/// Speech capture and playback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP-47 language tag used for recognition and synthesis.
    pub lang: String,
    /// Playback rate (1.0 is normal speed).
    pub rate: f32,
    /// Whether speech-to-text capture may be used when the platform supports it.
    pub capture_enabled: bool,
    /// Whether replies to voice input are spoken aloud.
    pub playback_enabled: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            lang: "pt-BR".to_string(),
            rate: 1.0,
            capture_enabled: true,
            playback_enabled: true,
        }
    }
}

/// Text-analysis backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper bound on a single backend call before the safe default is used.
    pub timeout_ms: u64,
    /// Terms that make the local moderator reject a comment.
    pub blocked_terms: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            blocked_terms: ["idiota", "burro", "otário", "lixo", "stupid", "idiot"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Static portal content served by the assistant and the recommender.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Cached headlines used for the news summary and its fallback.
    pub headlines: Vec<String>,
    /// Upcoming school events.
    pub events: Vec<SchoolEvent>,
    /// Articles available for recommendation.
    pub catalog: Vec<CatalogEntry>,
    /// Interests of the current reader.
    pub interests: Vec<String>,
    /// Titles the current reader has already opened.
    pub viewed_titles: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            headlines: vec![
                "Prova Paulista 2025: Inscrições abertas para o 2° bimestre".to_string(),
                "Feira de Ciências: Alunos apresentam projetos inovadores".to_string(),
                "Jogos Internos: Competições começam no dia 20/07".to_string(),
            ],
            events: vec![
                SchoolEvent::new("15/06", "Reunião de Pais", "Auditório"),
                SchoolEvent::new("01/07", "Feira de Ciências", "Quadra Coberta"),
                SchoolEvent::new("20/07", "Jogos Internos", "Quadras Esportivas"),
            ],
            catalog: vec![
                CatalogEntry::new(1, "Novo Laboratório de Robótica", &["tecnologia", "educação"]),
                CatalogEntry::new(2, "Resultados dos Jogos Internos", &["esportes"]),
                CatalogEntry::new(3, "Palestra sobre IA na Educação", &["tecnologia", "educação"]),
                CatalogEntry::new(4, "Inscrições para Olimpíada de Matemática", &["educação"]),
            ],
            interests: vec![
                "educação".to_string(),
                "tecnologia".to_string(),
                "esportes".to_string(),
            ],
            viewed_titles: vec!["Prova Paulista".to_string(), "Feira de Ciências".to_string()],
        }
    }
}
