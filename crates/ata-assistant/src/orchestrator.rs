//! Assistant engine: the command interface the UI calls into.
//!
//! Owns the session, the timeline and the response pipeline. Every state
//! change is published as an [`AssistantEvent`] on a broadcast channel.
//!
//! Exchanges run one at a time. A submission made while another is in
//! flight shows its user message at once and waits its turn for the reply;
//! submissions are answered in the order they arrived.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use uuid::Uuid;

use ata_analysis::{ModerationVerdict, SentimentScore, TextAnalyzer};
use ata_core::config::{AssistantConfig, AtaConfig, ContentConfig};
use ata_core::types::{Message, Sender, Timestamp};
use ata_core::AssistantEvent;

use crate::clock::{Clock, TokioClock};
use crate::error::AssistantError;
use crate::parser::{IntentClassifier, IntentResult};
use crate::response::{too_long_prompt, ResponseGenerator, EMPTY_INPUT_PROMPT};
use crate::timeline::{Session, Timeline, TimelineEntry};
use crate::voice::{final_transcript, strip_markup, Capabilities, RecognitionResult, VoiceIo};

/// Capacity of the notification channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How a submission was resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum ExchangeOutcome {
    /// The pipeline ran and appended this assistant reply.
    Replied(Message),
    /// The input was rejected with this clarification; the pipeline did not run.
    Clarified(Message),
    /// The session was deactivated before the reply was ready.
    Discarded,
}

impl ExchangeOutcome {
    pub fn message(&self) -> Option<&Message> {
        match self {
            ExchangeOutcome::Replied(m) | ExchangeOutcome::Clarified(m) => Some(m),
            ExchangeOutcome::Discarded => None,
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    session: Session,
    timeline: Timeline,
}

/// The conversational assistant for one page.
///
/// Constructed by the host and shared by handle (`Arc<Assistant>`) with the
/// UI glue and the comment flow.
pub struct Assistant {
    classifier: IntentClassifier,
    responder: ResponseGenerator,
    analyzer: TextAnalyzer,
    voice: VoiceIo,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
    exchange_gate: tokio::sync::Mutex<()>,
    listening_gate: tokio::sync::Mutex<()>,
    events: broadcast::Sender<AssistantEvent>,
    config: AssistantConfig,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("session", &self.session())
            .field("messages", &self.lock_state().timeline.len())
            .field("voice", &self.voice)
            .field("analyzer", &self.analyzer)
            .finish()
    }
}

impl Assistant {
    /// Create an inactive assistant. Voice backends are attached with
    /// [`Assistant::with_voice`].
    pub fn new(config: &AtaConfig, analyzer: TextAnalyzer) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            classifier: IntentClassifier::new(),
            responder: ResponseGenerator::new(
                analyzer.clone(),
                config.content.clone(),
                config.assistant.rng_seed,
            ),
            analyzer,
            voice: VoiceIo::from_config(&config.voice),
            clock: Arc::new(TokioClock),
            state: Mutex::new(EngineState::default()),
            exchange_gate: tokio::sync::Mutex::new(()),
            listening_gate: tokio::sync::Mutex::new(()),
            events,
            config: config.assistant.clone(),
        }
    }

    pub fn with_voice(mut self, voice: VoiceIo) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make generic reply selection reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        self.responder.reseed(seed);
        self
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Subscribe to engine notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.events.subscribe()
    }

    pub fn session(&self) -> Session {
        self.lock_state().session
    }

    /// Snapshot of the message log, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.lock_state().timeline.messages().to_vec()
    }

    /// Snapshot of the timeline in render order, placeholder included.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.lock_state().timeline.entries()
    }

    /// Voice controls the UI may enable.
    pub fn capabilities(&self) -> Capabilities {
        self.voice.capabilities()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Portal content the replies are built from.
    pub fn content(&self) -> &ContentConfig {
        self.responder.content()
    }

    // =========================================================================
    // Session commands
    // =========================================================================

    /// Activate or deactivate the assistant and return the new state.
    ///
    /// Activation seeds exactly one greeting. Deactivation stops listening
    /// and drops any typing placeholder; the exchange behind it will discard
    /// its reply.
    pub async fn toggle_active(&self) -> bool {
        let (active, was_listening) = {
            let mut state = self.lock_state();
            let was_listening = state.session.is_listening();
            let active = state.session.toggle_active();
            self.emit(AssistantEvent::SessionToggled {
                active,
                timestamp: Timestamp::now(),
            });

            if active {
                let greeting = state
                    .timeline
                    .append(Sender::Assistant, self.config.greeting.clone());
                self.emit_appended(greeting);
            } else {
                if let Some(placeholder) = state.timeline.clear_placeholder() {
                    self.emit(AssistantEvent::PlaceholderRemoved {
                        exchange_id: placeholder.exchange_id,
                        timestamp: Timestamp::now(),
                    });
                }
                if was_listening {
                    self.emit(AssistantEvent::ListeningToggled {
                        listening: false,
                        timestamp: Timestamp::now(),
                    });
                }
            }
            (active, was_listening)
        };

        if !active && was_listening {
            if let Err(e) = self.voice.stop_capture().await {
                tracing::warn!(error = %e, "Failed to stop speech capture on deactivation");
            }
        }

        tracing::info!(active, "Assistant toggled");
        active
    }

    /// Start or stop voice capture and return the new listening state.
    ///
    /// Rejected with `Inactive` while the assistant is off, and with
    /// `CapabilityUnavailable` when there is no capture backend. Overlapping
    /// calls run one after the other, so two quick toggles end not listening.
    pub async fn toggle_listening(&self) -> Result<bool, AssistantError> {
        let _toggle = self.listening_gate.lock().await;

        let start = {
            let state = self.lock_state();
            if !state.session.is_active() {
                return Err(AssistantError::Inactive);
            }
            !state.session.is_listening()
        };

        if start {
            self.voice.start_capture().await?;
            let accepted = {
                let mut state = self.lock_state();
                let accepted = state.session.set_listening(true);
                if accepted.is_ok() {
                    self.emit(AssistantEvent::ListeningToggled {
                        listening: true,
                        timestamp: Timestamp::now(),
                    });
                    let prompt = state
                        .timeline
                        .append(Sender::System, self.config.listening_prompt.clone());
                    self.emit_appended(prompt);
                }
                accepted
            };
            if let Err(e) = accepted {
                // Deactivated while the backend was starting.
                if let Err(stop_err) = self.voice.stop_capture().await {
                    tracing::warn!(error = %stop_err, "Failed to stop speech capture after deactivation");
                }
                return Err(e);
            }
        } else {
            self.end_listening();
            self.voice.stop_capture().await?;
        }

        tracing::debug!(listening = start, "Listening toggled");
        Ok(start)
    }

    /// Append a message directly, outside of any exchange.
    pub fn append_message(&self, sender: Sender, content: impl Into<String>) -> Message {
        let message = self.lock_state().timeline.append(sender, content);
        self.emit_appended(message.clone());
        message
    }

    // =========================================================================
    // Submissions
    // =========================================================================

    /// Submit typed input.
    pub async fn submit_text(&self, text: &str) -> Result<ExchangeOutcome, AssistantError> {
        self.require_active()?;
        Ok(self.run_exchange(text, false).await)
    }

    /// Submit a final voice transcript. Ends listening and speaks the reply.
    pub async fn submit_voice_transcript(
        &self,
        transcript: &str,
    ) -> Result<ExchangeOutcome, AssistantError> {
        self.require_active()?;
        self.end_listening();
        Ok(self.run_exchange(transcript, true).await)
    }

    /// Hand a completed capture to the engine.
    ///
    /// Only the first finalized alternative is used. Returns `None` when the
    /// capture produced no final transcript.
    pub async fn deliver_recognition(
        &self,
        results: &[RecognitionResult],
    ) -> Result<Option<ExchangeOutcome>, AssistantError> {
        {
            let state = self.lock_state();
            if !state.session.is_active() {
                return Err(AssistantError::Inactive);
            }
            if !state.session.is_listening() {
                return Err(AssistantError::NotListening);
            }
        }

        match final_transcript(results) {
            Some(transcript) => Ok(Some(self.submit_voice_transcript(&transcript).await?)),
            None => {
                tracing::debug!(results = results.len(), "Capture ended without a final transcript");
                self.end_listening();
                Ok(None)
            }
        }
    }

    // =========================================================================
    // Analysis surface for the comment flow
    // =========================================================================

    pub fn classify(&self, text: &str) -> IntentResult {
        self.classifier.classify(text)
    }

    /// Tone of a comment draft. Neutral with zero confidence when unavailable.
    pub async fn analyze_sentiment(&self, text: &str) -> SentimentScore {
        self.analyzer.analyze_sentiment(text).await
    }

    /// Moderation verdict for a comment. Approved when unavailable.
    pub async fn moderate(&self, text: &str) -> ModerationVerdict {
        self.analyzer.moderate(text).await
    }

    // -- Private helpers --

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish an event. Having no subscribers is fine.
    fn emit(&self, event: AssistantEvent) {
        tracing::trace!(event = event.event_name(), "Emitting event");
        let _ = self.events.send(event);
    }

    fn emit_appended(&self, message: Message) {
        self.emit(AssistantEvent::MessageAppended {
            message,
            timestamp: Timestamp::now(),
        });
    }

    fn require_active(&self) -> Result<(), AssistantError> {
        if self.lock_state().session.is_active() {
            Ok(())
        } else {
            Err(AssistantError::Inactive)
        }
    }

    /// Clear the listening flag without touching the capture backend.
    fn end_listening(&self) {
        let mut state = self.lock_state();
        if state.session.is_listening() && state.session.set_listening(false).is_ok() {
            self.emit(AssistantEvent::ListeningToggled {
                listening: false,
                timestamp: Timestamp::now(),
            });
        }
    }

    /// Append a clarification in place of running the pipeline.
    fn clarify(&self, prompt: String) -> ExchangeOutcome {
        ExchangeOutcome::Clarified(self.append_message(Sender::Assistant, prompt))
    }

    /// One full exchange: user message, placeholder, latency, reply.
    ///
    /// Validation and the user message happen at submission time. Only the
    /// placeholder, the latency and the reply wait for the exchange gate.
    async fn run_exchange(&self, raw: &str, spoken: bool) -> ExchangeOutcome {
        let text = raw.trim();
        let exchange_id = Uuid::new_v4();

        if text.is_empty() {
            return self.clarify(EMPTY_INPUT_PROMPT.to_string());
        }
        let length = text.chars().count();
        if length > self.config.max_message_length {
            tracing::debug!(length, max = self.config.max_message_length, "Input too long");
            return self.clarify(too_long_prompt(self.config.max_message_length));
        }

        let generation = {
            let mut state = self.lock_state();
            if !state.session.is_active() {
                return ExchangeOutcome::Discarded;
            }
            let user = state.timeline.append(Sender::User, text);
            self.emit_appended(user);
            state.session.generation()
        };

        let _turn = self.exchange_gate.lock().await;

        {
            let mut state = self.lock_state();
            // Deactivated while queued.
            if !state.session.is_active() || state.session.generation() != generation {
                tracing::debug!(%exchange_id, "Queued submission dropped, assistant inactive");
                self.emit(AssistantEvent::ExchangeDiscarded {
                    exchange_id,
                    timestamp: Timestamp::now(),
                });
                return ExchangeOutcome::Discarded;
            }
            if state.timeline.show_placeholder(exchange_id) {
                self.emit(AssistantEvent::PlaceholderShown {
                    exchange_id,
                    timestamp: Timestamp::now(),
                });
            }
        }

        self.clock
            .sleep(Duration::from_millis(self.config.typing_delay_ms))
            .await;

        let intent = self.classifier.classify(text);
        let reply = self.responder.respond(text, &intent).await;

        let outcome = {
            let mut state = self.lock_state();
            if state.timeline.remove_placeholder(exchange_id) {
                self.emit(AssistantEvent::PlaceholderRemoved {
                    exchange_id,
                    timestamp: Timestamp::now(),
                });
            }

            if state.session.is_active() && state.session.generation() == generation {
                let message = state.timeline.append(Sender::Assistant, reply);
                self.emit_appended(message.clone());
                ExchangeOutcome::Replied(message)
            } else {
                self.emit(AssistantEvent::ExchangeDiscarded {
                    exchange_id,
                    timestamp: Timestamp::now(),
                });
                ExchangeOutcome::Discarded
            }
        };

        match &outcome {
            ExchangeOutcome::Replied(message) => {
                tracing::info!(
                    %exchange_id,
                    intent = %intent.category,
                    spoken,
                    "Exchange resolved"
                );
                if spoken && self.voice.capabilities().playback {
                    self.emit(AssistantEvent::SpeechRequested {
                        text_length: strip_markup(&message.content).chars().count(),
                        timestamp: Timestamp::now(),
                    });
                    self.voice.speak(&message.content).await;
                }
            }
            _ => tracing::info!(%exchange_id, "Reply discarded, assistant was deactivated"),
        }

        outcome
    }
}

// =============================================================================
// Tests
// =============================================================================
