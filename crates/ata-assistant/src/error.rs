//! Error types for the assistant engine.
//!
//! Only misuse of the command interface is reported as an error. Backend
//! failures and invalid input are absorbed by the engine and never reach
//! the reader.

/// Errors from the assistant engine.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant is not active")]
    Inactive,
    #[error("assistant is not listening")]
    NotListening,
    #[error("{0} is not available on this platform")]
    CapabilityUnavailable(String),
    #[error("voice error: {0}")]
    VoiceError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_error_display() {
        assert_eq!(AssistantError::Inactive.to_string(), "assistant is not active");
        assert_eq!(
            AssistantError::NotListening.to_string(),
            "assistant is not listening"
        );

        let err = AssistantError::CapabilityUnavailable("speech capture".to_string());
        assert_eq!(
            err.to_string(),
            "speech capture is not available on this platform"
        );

        let err = AssistantError::VoiceError("microphone permission denied".to_string());
        assert_eq!(err.to_string(), "voice error: microphone permission denied");
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", AssistantError::Inactive);
        assert!(dbg.contains("Inactive"));
    }
}
