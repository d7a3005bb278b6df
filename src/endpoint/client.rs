//! HTTP client for the submission endpoint
//!
//! The endpoint speaks a tiny JSON protocol: every poll is one request with
//! no body, answered by a single status object. Anything the protocol does
//! not cover (transport failures, non-success HTTP statuses, malformed
//! bodies, unknown status tags) becomes a typed [`SubmitError`] so the
//! controller can fail the submission explicitly instead of hanging.

use crate::error::SubmitError;
use crate::ports::SubmitEndpoint;
use crate::state::SubmissionStatus;
use async_trait::async_trait;
use serde_json::Value;

/// HTTP implementation of [`SubmitEndpoint`]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// Create a client polling the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SubmitEndpoint for HttpEndpoint {
    async fn poll(&mut self) -> Result<SubmissionStatus, SubmitError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let http_status = response.status();
        if !http_status.is_success() {
            return Err(SubmitError::HttpStatus(http_status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        parse_status(&body)
    }
}

/// Decode a poll response body into a submission status
///
/// The status tag is inspected first so an unknown tag is reported as
/// [`SubmitError::UnrecognizedStatus`] rather than a generic decode error.
pub(crate) fn parse_status(body: &str) -> Result<SubmissionStatus, SubmitError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SubmitError::MalformedBody(e.to_string()))?;

    let tag = value
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_owned);
    match tag.as_deref() {
        Some("success" | "error" | "progress") => serde_json::from_value(value)
            .map_err(|e| SubmitError::MalformedBody(e.to_string())),
        Some(other) => Err(SubmitError::UnrecognizedStatus(other.to_string())),
        None => Err(SubmitError::MalformedBody(
            "missing \"status\" field".to_string(),
        )),
    }
}
