use thiserror::Error;

/// Errors a text-analysis backend can report.
///
/// These never reach the reader: [`crate::TextAnalyzer`] turns each of them
/// into the operation's safe default.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("backend timed out after {0} ms")]
    Timeout(u64),
    #[error("backend returned no usable payload")]
    EmptyPayload,
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_backend() {
        let e = AnalysisError::Backend("model not loaded".to_string());
        assert_eq!(e.to_string(), "backend error: model not loaded");
    }

    #[test]
    fn test_error_display_timeout() {
        let e = AnalysisError::Timeout(5000);
        assert_eq!(e.to_string(), "backend timed out after 5000 ms");
    }

    #[test]
    fn test_error_display_empty_payload() {
        assert_eq!(
            AnalysisError::EmptyPayload.to_string(),
            "backend returned no usable payload"
        );
    }

    #[test]
    fn test_error_display_unsupported() {
        let e = AnalysisError::Unsupported("no known words".to_string());
        assert_eq!(e.to_string(), "unsupported input: no known words");
    }
}
