//! Conversational assistant engine for the Jornal A.T.A portal.
//!
//! Classifies reader input, runs the asynchronous reply pipeline with its
//! typing placeholder, keeps the session timeline, and bridges to optional
//! voice capture and playback.

pub mod clock;
pub mod comments;
pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod recommend;
pub mod response;
pub mod timeline;
pub mod voice;

pub use clock::{Clock, ImmediateClock, TokioClock};
pub use comments::{CommentDecision, CommentGate, SentimentIndicator};
pub use error::AssistantError;
pub use orchestrator::{Assistant, ExchangeOutcome};
pub use parser::{strip_translation_trigger, Intent, IntentClassifier, IntentResult};
pub use recommend::{recommend, InterestProfile};
pub use response::{ResponseGenerator, GENERIC_RESPONSES};
pub use timeline::{Session, Timeline, TimelineEntry, TypingPlaceholder};
pub use voice::{
    final_transcript, strip_markup, Capabilities, RecognitionResult, SpeechCapture,
    SpeechSynthesizer, Utterance, VoiceIo,
};
