//! Voice boundary: speech capture and playback adapters.
//!
//! Both capabilities are optional. The engine only talks to the traits below;
//! the host decides what backs them (browser speech APIs, a console printer,
//! nothing at all). A missing capability disables the matching control and
//! leaves the rest of the assistant untouched.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use ata_core::config::VoiceConfig;

use crate::error::AssistantError;

// =============================================================================
// Types
// =============================================================================

/// A request to speak `text` once with a fixed language and rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
}

/// One recognition event from a capture backend.
///
/// Backends may deliver interim results before the final one; only the
/// first finalized result is ever used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub is_final: bool,
    /// Candidate transcripts, best first.
    pub alternatives: Vec<String>,
}

impl RecognitionResult {
    pub fn interim(transcript: &str) -> Self {
        Self {
            is_final: false,
            alternatives: vec![transcript.to_string()],
        }
    }

    pub fn finalized(alternatives: &[&str]) -> Self {
        Self {
            is_final: true,
            alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Which voice controls the UI may enable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub capture: bool,
    pub playback: bool,
}

/// First alternative of the first finalized result, trimmed.
///
/// `None` when no result is final or the transcript is blank.
pub fn final_transcript(results: &[RecognitionResult]) -> Option<String> {
    results
        .iter()
        .find(|r| r.is_final)
        .and_then(|r| r.alternatives.first())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid markup regex"));

/// Remove HTML tags so replies can be spoken. Whitespace is collapsed.
pub fn strip_markup(html: &str) -> String {
    let plain = MARKUP.replace_all(html, " ");
    plain.split_whitespace().collect::<Vec<_>>().join(" ")
}

// =============================================================================
// Adapter traits
// =============================================================================

/// Speech-to-text capture. Transcripts are delivered back to the engine by
/// the host through `Assistant::deliver_recognition`.
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    fn name(&self) -> &str;

    async fn start(&self, lang: &str) -> Result<(), AssistantError>;

    async fn stop(&self) -> Result<(), AssistantError>;
}

/// Text-to-speech playback.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    async fn speak(&self, utterance: Utterance) -> Result<(), AssistantError>;
}

// =============================================================================
// VoiceIo
// =============================================================================

/// The engine's handle on whatever voice backends the host provides.
#[derive(Clone)]
pub struct VoiceIo {
    capture: Option<Arc<dyn SpeechCapture>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    lang: String,
    rate: f32,
    capture_enabled: bool,
    playback_enabled: bool,
}

impl std::fmt::Debug for VoiceIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceIo")
            .field("capture", &self.capture.as_ref().map(|c| c.name().to_string()))
            .field(
                "synthesizer",
                &self.synthesizer.as_ref().map(|s| s.name().to_string()),
            )
            .field("lang", &self.lang)
            .field("rate", &self.rate)
            .finish()
    }
}

impl Default for VoiceIo {
    fn default() -> Self {
        Self::disabled()
    }
}

impl VoiceIo {
    /// No capture, no playback.
    pub fn disabled() -> Self {
        Self::from_config(&VoiceConfig::default())
    }

    /// Empty voice handle using the configured language and rate.
    ///
    /// Backends attached later are ignored when the matching capability is
    /// switched off in the config.
    pub fn from_config(config: &VoiceConfig) -> Self {
        Self {
            capture: None,
            synthesizer: None,
            lang: config.lang.clone(),
            rate: config.rate,
            capture_enabled: config.capture_enabled,
            playback_enabled: config.playback_enabled,
        }
    }

    pub fn with_capture(mut self, capture: Arc<dyn SpeechCapture>) -> Self {
        if self.capture_enabled {
            self.capture = Some(capture);
        } else {
            tracing::debug!(backend = capture.name(), "Speech capture disabled by config");
        }
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        if self.playback_enabled {
            self.synthesizer = Some(synthesizer);
        } else {
            tracing::debug!(
                backend = synthesizer.name(),
                "Speech playback disabled by config"
            );
        }
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            capture: self.capture.is_some(),
            playback: self.synthesizer.is_some(),
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Start capture. Fails with `CapabilityUnavailable` when there is no
    /// capture backend.
    pub async fn start_capture(&self) -> Result<(), AssistantError> {
        let capture = self
            .capture
            .as_ref()
            .ok_or_else(|| AssistantError::CapabilityUnavailable("speech capture".to_string()))?;
        capture.start(&self.lang).await
    }

    /// Stop capture. A no-op without a capture backend.
    pub async fn stop_capture(&self) -> Result<(), AssistantError> {
        match &self.capture {
            Some(capture) => capture.stop().await,
            None => Ok(()),
        }
    }

    /// Speak `html` once with markup removed. Returns whether playback was
    /// handed to a backend; failures are logged and swallowed.
    pub async fn speak(&self, html: &str) -> bool {
        let Some(synthesizer) = &self.synthesizer else {
            return false;
        };
        let text = strip_markup(html);
        if text.is_empty() {
            return false;
        }

        let utterance = Utterance {
            text,
            lang: self.lang.clone(),
            rate: self.rate,
        };
        match synthesizer.speak(utterance).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(backend = synthesizer.name(), error = %e, "Speech playback failed");
                false
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSynth {
        spoken: Mutex<Vec<Utterance>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynth {
        fn name(&self) -> &str {
            "recording"
        }

        async fn speak(&self, utterance: Utterance) -> Result<(), AssistantError> {
            self.spoken.lock().unwrap().push(utterance);
            Ok(())
        }
    }

    struct BrokenSynth;

    #[async_trait]
    impl SpeechSynthesizer for BrokenSynth {
        fn name(&self) -> &str {
            "broken"
        }

        async fn speak(&self, _utterance: Utterance) -> Result<(), AssistantError> {
            Err(AssistantError::VoiceError("audio device busy".to_string()))
        }
    }

    #[derive(Default)]
    struct FlagCapture {
        running: AtomicBool,
    }

    #[async_trait]
    impl SpeechCapture for FlagCapture {
        fn name(&self) -> &str {
            "flag"
        }

        async fn start(&self, _lang: &str) -> Result<(), AssistantError> {
            self.running.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> Result<(), AssistantError> {
            self.running.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    // ---- Transcript selection ----

    #[test]
    fn test_final_transcript_skips_interim() {
        let results = vec![
            RecognitionResult::interim("quais as"),
            RecognitionResult::finalized(&["quais as notícias", "quais as notícia"]),
        ];
        assert_eq!(final_transcript(&results).as_deref(), Some("quais as notícias"));
    }

    #[test]
    fn test_final_transcript_uses_first_final_only() {
        let results = vec![
            RecognitionResult::finalized(&[" ajuda "]),
            RecognitionResult::finalized(&["eventos"]),
        ];
        assert_eq!(final_transcript(&results).as_deref(), Some("ajuda"));
    }

    #[test]
    fn test_final_transcript_none_cases() {
        assert!(final_transcript(&[]).is_none());
        assert!(final_transcript(&[RecognitionResult::interim("oi")]).is_none());
        assert!(final_transcript(&[RecognitionResult::finalized(&[])]).is_none());
        assert!(final_transcript(&[RecognitionResult::finalized(&["   "])]).is_none());
    }

    // ---- Markup ----

    #[test]
    fn test_strip_markup() {
        let html = "Próximos eventos:<br><br><strong>15/06:</strong> Reunião de Pais (Auditório)";
        assert_eq!(
            strip_markup(html),
            "Próximos eventos: 15/06: Reunião de Pais (Auditório)"
        );
    }

    #[test]
    fn test_strip_markup_plain_text_unchanged() {
        assert_eq!(strip_markup("sem marcação"), "sem marcação");
        assert_eq!(strip_markup("<br>"), "");
    }

    // ---- VoiceIo ----

    #[test]
    fn test_disabled_has_no_capabilities() {
        let voice = VoiceIo::disabled();
        assert_eq!(voice.capabilities(), Capabilities::default());
        assert_eq!(voice.lang(), "pt-BR");
        assert!((voice.rate() - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_start_capture_without_backend_is_unavailable() {
        let voice = VoiceIo::disabled();
        assert!(matches!(
            voice.start_capture().await,
            Err(AssistantError::CapabilityUnavailable(_))
        ));
        assert!(voice.stop_capture().await.is_ok());
    }

    #[tokio::test]
    async fn test_capture_start_stop() {
        let capture = Arc::new(FlagCapture::default());
        let voice = VoiceIo::disabled().with_capture(capture.clone());
        assert!(voice.capabilities().capture);
        voice.start_capture().await.unwrap();
        assert!(capture.running.load(Ordering::SeqCst));
        voice.stop_capture().await.unwrap();
        assert!(!capture.running.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_speak_strips_markup_and_uses_fixed_voice() {
        let synth = Arc::new(RecordingSynth::default());
        let voice = VoiceIo::disabled().with_synthesizer(synth.clone());
        assert!(voice.speak("Tradução para inglês:<br><br>\"escola\"").await);

        let spoken = synth.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "Tradução para inglês: \"escola\"");
        assert_eq!(spoken[0].lang, "pt-BR");
    }

    #[tokio::test]
    async fn test_speak_without_synth_is_noop() {
        assert!(!VoiceIo::disabled().speak("olá").await);
    }

    #[tokio::test]
    async fn test_speak_failure_is_swallowed() {
        let voice = VoiceIo::disabled().with_synthesizer(Arc::new(BrokenSynth));
        assert!(!voice.speak("olá").await);
    }

    #[tokio::test]
    async fn test_config_can_switch_off_backends() {
        let config = VoiceConfig {
            capture_enabled: false,
            playback_enabled: false,
            ..VoiceConfig::default()
        };
        let voice = VoiceIo::from_config(&config)
            .with_capture(Arc::new(FlagCapture::default()))
            .with_synthesizer(Arc::new(RecordingSynth::default()));
        assert_eq!(voice.capabilities(), Capabilities::default());
    }

    #[test]
    fn test_debug_names_backends() {
        let voice = VoiceIo::disabled().with_synthesizer(Arc::new(RecordingSynth::default()));
        let dbg = format!("{:?}", voice);
        assert!(dbg.contains("recording"));
    }
}
