//! Trait abstractions for external collaborators to enable mocking in tests
//!
//! The controller only ever talks to the form, the display and the server
//! through these seams, so the whole submission lifecycle runs under test
//! with no UI and no network.

use crate::error::SubmitError;
use crate::state::{FieldName, FormData, SubmissionStatus};
use async_trait::async_trait;
use std::collections::HashMap;

/// Read/write access to the current form values
#[cfg_attr(test, mockall::automock)]
pub trait FormDataSource: Send + Sync {
    /// Current trimmed values of the fillable fields
    fn get_data(&self) -> FormData;

    /// Apply new values; keys outside the fillable set are ignored silently
    fn set_data(&mut self, values: HashMap<String, String>);
}

/// Where validation and submission outcomes are displayed
#[cfg_attr(test, mockall::automock)]
pub trait ResultSink: Send + Sync {
    /// Remove any error marks left by a previous attempt
    fn clear_errors(&mut self);

    /// Mark the given fields as failing validation
    fn mark_fields_invalid(&mut self, fields: &[FieldName]);

    /// Show the in-progress indicator
    fn show_progress(&mut self);

    /// Show the fixed success indicator
    fn show_success(&mut self);

    /// Show a failure with the given reason text
    fn show_error(&mut self, reason: &str);
}

/// One request/response exchange with the submission endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitEndpoint: Send + Sync {
    /// Ask the server for the current status of this submission
    async fn poll(&mut self) -> Result<SubmissionStatus, SubmitError>;
}
