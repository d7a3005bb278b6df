//! Error types for the submission protocol
//!
//! Field-level validation failures are not errors; they only ever surface
//! through `ValidationResult`. The variants here cover the ways a poll of
//! the submission endpoint can go wrong, and the controller converts every
//! one of them into an explicit failed terminal state instead of hanging.

use thiserror::Error;

/// Failure while polling the submission endpoint
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request never produced a usable response
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status
    #[error("unexpected http status {0}")]
    HttpStatus(u16),

    /// The response body could not be decoded as a submission status
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// The response carried a status tag outside the known protocol
    #[error("unrecognized submission status \"{0}\"")]
    UnrecognizedStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_reason() {
        let err = SubmitError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn test_unrecognized_status_names_the_tag() {
        let err = SubmitError::UnrecognizedStatus("queued".to_string());
        assert!(err.to_string().contains("queued"));
    }
}
