//! Error types for the chat engine.

use repcoach_core::error::RepcoachError;

use crate::state_machine::TurnState;

/// Why a generation call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationFailure {
    /// The service could not be reached or the request timed out.
    Transport,
    /// The service rejected the credentials (401/403).
    Authentication,
    /// Any other non-success status.
    Status(u16),
    /// The service answered with no text.
    EmptyResponse,
    /// The response body could not be parsed.
    Malformed,
}

impl std::fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationFailure::Transport => f.write_str("transport"),
            GenerationFailure::Authentication => f.write_str("authentication"),
            GenerationFailure::Status(code) => write!(f, "status {}", code),
            GenerationFailure::EmptyResponse => f.write_str("empty response"),
            GenerationFailure::Malformed => f.write_str("malformed response"),
        }
    }
}

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("exercise catalog unavailable: {0}")]
    CatalogUnavailable(String),
    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("question exceeds maximum length of {0} characters")]
    QuestionTooLong(usize),
    #[error("generation failed ({kind}): {message}")]
    Generation {
        kind: GenerationFailure,
        message: String,
    },
    #[error("media fetch failed: {0}")]
    MediaFetch(String),
    #[error("invalid turn transition: {0:?} -> {1:?}")]
    InvalidTransition(TurnState, TurnState),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    pub fn generation(kind: GenerationFailure, message: impl Into<String>) -> Self {
        ChatError::Generation {
            kind,
            message: message.into(),
        }
    }
}

impl From<RepcoachError> for ChatError {
    fn from(err: RepcoachError) -> Self {
        ChatError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::CatalogUnavailable("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "exercise catalog unavailable: connection refused"
        );

        let err = ChatError::EmptyQuestion;
        assert_eq!(err.to_string(), "question cannot be empty");

        let err = ChatError::QuestionTooLong(2000);
        assert_eq!(
            err.to_string(),
            "question exceeds maximum length of 2000 characters"
        );

        let err = ChatError::MediaFetch("404".to_string());
        assert_eq!(err.to_string(), "media fetch failed: 404");

        let err = ChatError::Config("bad url".to_string());
        assert_eq!(err.to_string(), "configuration error: bad url");
    }

    #[test]
    fn test_generation_error_display_includes_kind() {
        let err = ChatError::generation(GenerationFailure::Authentication, "invalid key");
        assert_eq!(
            err.to_string(),
            "generation failed (authentication): invalid key"
        );

        let err = ChatError::generation(GenerationFailure::Status(503), "overloaded");
        assert_eq!(err.to_string(), "generation failed (status 503): overloaded");
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = ChatError::InvalidTransition(TurnState::Idle, TurnState::Complete);
        assert_eq!(err.to_string(), "invalid turn transition: Idle -> Complete");
    }

    #[test]
    fn test_chat_error_from_repcoach_error() {
        let core_err = RepcoachError::Config("missing field".to_string());
        let chat_err: ChatError = core_err.into();
        assert!(matches!(chat_err, ChatError::Config(_)));
        assert!(chat_err.to_string().contains("missing field"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::EmptyQuestion);
        assert!(dbg.contains("EmptyQuestion"));

        let dbg = format!(
            "{:?}",
            ChatError::generation(GenerationFailure::Transport, "x")
        );
        assert!(dbg.contains("Transport"));
    }
}
