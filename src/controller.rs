//! Submission lifecycle orchestration
//!
//! One controller instance drives one form: validate, then poll the
//! submission endpoint until the server reports a terminal outcome. The
//! whole lifecycle is single-threaded and cooperative; the only suspension
//! points are the endpoint await and the delay the server asks for between
//! progress polls.

use crate::config::PollConfig;
use crate::ports::{FormDataSource, ResultSink, SubmitEndpoint};
use crate::state::{SubmissionState, SubmissionStatus};
use crate::validation::Validator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Signals an in-flight submission to stop scheduling further polls
///
/// Cloned handles share one flag; cancelling any of them moves the
/// submission to the `Cancelled` terminal state before the next poll.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Drives one submission attempt from validation to a terminal state
pub struct SubmissionController<S, R, E>
where
    S: FormDataSource,
    R: ResultSink,
    E: SubmitEndpoint,
{
    source: S,
    sink: R,
    endpoint: E,
    validator: Validator,
    poll: PollConfig,
    state: SubmissionState,
    cancel: CancellationToken,
}

impl<S, R, E> SubmissionController<S, R, E>
where
    S: FormDataSource,
    R: ResultSink,
    E: SubmitEndpoint,
{
    /// Create a controller in the idle state
    pub fn new(source: S, sink: R, endpoint: E, validator: Validator, poll: PollConfig) -> Self {
        Self {
            source,
            sink,
            endpoint,
            validator,
            poll,
            state: SubmissionState::Idle,
            cancel: CancellationToken::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Whether the resubmission trigger should be enabled
    pub fn trigger_enabled(&self) -> bool {
        !self.state.is_in_flight()
    }

    /// Handle that cancels the in-flight submission when signaled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run one submission attempt to its terminal state
    ///
    /// Invalid data is reported to the sink and never reaches the server.
    /// Valid data starts the poll loop, which only ends on a terminal
    /// server status, a protocol failure, a configured poll limit or
    /// cancellation. The controller is back in `Idle` when this returns,
    /// ready for the next attempt.
    pub async fn submit(&mut self) -> SubmissionState {
        if self.state.is_in_flight() {
            tracing::warn!("submit ignored: a submission is already in flight");
            return self.state.clone();
        }

        self.state = SubmissionState::Validating;
        let data = self.source.get_data();
        let verdict = self.validator.validate(&data);

        self.sink.clear_errors();
        if !verdict.is_valid {
            tracing::debug!(fields = ?verdict.error_fields, "validation failed");
            self.sink.mark_fields_invalid(&verdict.error_fields);
            self.state = SubmissionState::Invalid;
            return self.finish();
        }

        // Trigger stays disabled (trigger_enabled is false) for the whole
        // poll loop; this is the only guard against overlapping attempts.
        self.state = SubmissionState::Submitting;
        tracing::info!("submission started");
        self.state = self.run_poll_loop().await;
        self.finish()
    }

    /// Take the terminal outcome and return the controller to idle
    fn finish(&mut self) -> SubmissionState {
        std::mem::take(&mut self.state)
    }

    async fn run_poll_loop(&mut self) -> SubmissionState {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("submission cancelled");
                return SubmissionState::Cancelled;
            }
            if let Some(max) = self.poll.max_attempts {
                if attempts >= max {
                    let reason = format!("no terminal status after {max} poll attempts");
                    self.sink.show_error(&reason);
                    return SubmissionState::Failed(reason);
                }
            }
            if let Some(max) = self.poll.max_duration {
                if started.elapsed() >= max {
                    let reason =
                        format!("no terminal status after {}ms of polling", max.as_millis());
                    self.sink.show_error(&reason);
                    return SubmissionState::Failed(reason);
                }
            }

            self.state = SubmissionState::Polling;
            attempts += 1;
            match self.endpoint.poll().await {
                Ok(SubmissionStatus::Success) => {
                    tracing::info!(attempts, "submission succeeded");
                    self.sink.show_success();
                    return SubmissionState::Succeeded;
                }
                Ok(SubmissionStatus::Error { reason }) => {
                    tracing::info!(%reason, "submission rejected by server");
                    self.sink.show_error(&reason);
                    return SubmissionState::Failed(reason);
                }
                Ok(SubmissionStatus::Progress { timeout }) => {
                    tracing::debug!(timeout_ms = timeout, "submission still in progress");
                    self.sink.show_progress();
                    sleep(Duration::from_millis(timeout)).await;
                }
                Err(err) => {
                    let reason = err.to_string();
                    tracing::warn!(%reason, "poll failed");
                    self.sink.show_error(&reason);
                    return SubmissionState::Failed(reason);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubmitError;
    use crate::ports::{MockFormDataSource, MockResultSink, MockSubmitEndpoint};
    use crate::state::{FieldName, FormData};
    use mockall::Sequence;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn valid_data() -> FormData {
        FormData::new("Иванов Иван Иванович", "user@ya.ru", "+7(111)111-11-11")
    }

    fn source_with(data: FormData) -> MockFormDataSource {
        let mut source = MockFormDataSource::new();
        source.expect_get_data().return_const(data);
        source
    }

    fn controller(
        source: MockFormDataSource,
        sink: MockResultSink,
        endpoint: MockSubmitEndpoint,
        poll: PollConfig,
    ) -> SubmissionController<MockFormDataSource, MockResultSink, MockSubmitEndpoint> {
        SubmissionController::new(source, sink, endpoint, Validator::default(), poll)
    }

    #[test]
    fn test_invalid_form_never_reaches_the_server() {
        let source = source_with(FormData::new("Иванов Иван", "user@ya.ru", "+7(111)111-11-11"));

        let mut sink = MockResultSink::new();
        let mut seq = Sequence::new();
        sink.expect_clear_errors()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        sink.expect_mark_fields_invalid()
            .withf(|fields| fields == [FieldName::Fio])
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        // No expectations: any poll would panic the mock
        let endpoint = MockSubmitEndpoint::new();

        let mut controller = controller(source, sink, endpoint, PollConfig::default());
        let outcome = tokio_test::block_on(controller.submit());

        assert_eq!(outcome, SubmissionState::Invalid);
        assert_eq!(controller.state(), &SubmissionState::Idle);
        assert!(controller.trigger_enabled());
    }

    #[test]
    fn test_all_invalid_fields_are_marked_in_order() {
        let source = source_with(FormData::default());

        let mut sink = MockResultSink::new();
        sink.expect_clear_errors().times(1).return_const(());
        sink.expect_mark_fields_invalid()
            .withf(|fields| fields == [FieldName::Fio, FieldName::Email, FieldName::Phone])
            .times(1)
            .return_const(());

        let endpoint = MockSubmitEndpoint::new();

        let mut controller = controller(source, sink, endpoint, PollConfig::default());
        let outcome = tokio_test::block_on(controller.submit());
        assert_eq!(outcome, SubmissionState::Invalid);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_polls_until_success_in_order() {
        let source = source_with(valid_data());

        let poll_times: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        let mut seq = Sequence::new();

        let mut sink = MockResultSink::new();
        sink.expect_clear_errors()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut endpoint = MockSubmitEndpoint::new();
        for status in [
            SubmissionStatus::Progress { timeout: 100 },
            SubmissionStatus::Progress { timeout: 50 },
            SubmissionStatus::Success,
        ] {
            let is_success = matches!(status, SubmissionStatus::Success);
            let times = Arc::clone(&poll_times);
            endpoint
                .expect_poll()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move || {
                    times.lock().unwrap().push(Instant::now());
                    Ok(status.clone())
                });
            if is_success {
                sink.expect_show_success()
                    .times(1)
                    .in_sequence(&mut seq)
                    .return_const(());
            } else {
                sink.expect_show_progress()
                    .times(1)
                    .in_sequence(&mut seq)
                    .return_const(());
            }
        }

        let mut controller = controller(source, sink, endpoint, PollConfig::default());
        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmissionState::Succeeded);
        assert_eq!(controller.state(), &SubmissionState::Idle);

        // Each poll waits out the delay the previous response asked for
        let times = poll_times.lock().unwrap();
        assert_eq!(times.len(), 3);
        assert_eq!(times[1] - times[0], Duration::from_millis(100));
        assert_eq!(times[2] - times[1], Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_server_error_reason_reaches_the_sink() {
        let source = source_with(valid_data());

        let mut sink = MockResultSink::new();
        sink.expect_clear_errors().times(1).return_const(());
        sink.expect_show_error()
            .withf(|reason| reason == "form already submitted")
            .times(1)
            .return_const(());

        let mut endpoint = MockSubmitEndpoint::new();
        endpoint.expect_poll().times(1).returning(|| {
            Ok(SubmissionStatus::Error {
                reason: "form already submitted".to_string(),
            })
        });

        let mut controller = controller(source, sink, endpoint, PollConfig::default());
        let outcome = controller.submit().await;
        assert_eq!(
            outcome,
            SubmissionState::Failed("form already submitted".to_string())
        );
    }

    #[tokio::test]
    async fn test_unrecognized_status_fails_instead_of_hanging() {
        let source = source_with(valid_data());

        let mut sink = MockResultSink::new();
        sink.expect_clear_errors().times(1).return_const(());
        sink.expect_show_error()
            .withf(|reason| !reason.is_empty() && reason.contains("queued"))
            .times(1)
            .return_const(());

        let mut endpoint = MockSubmitEndpoint::new();
        endpoint
            .expect_poll()
            .times(1)
            .returning(|| Err(SubmitError::UnrecognizedStatus("queued".to_string())));

        let mut controller = controller(source, sink, endpoint, PollConfig::default());
        let outcome = controller.submit().await;
        assert!(matches!(outcome, SubmissionState::Failed(reason) if reason.contains("queued")));
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_explicit_failure() {
        let source = source_with(valid_data());

        let mut sink = MockResultSink::new();
        sink.expect_clear_errors().times(1).return_const(());
        sink.expect_show_error().times(1).return_const(());

        let mut endpoint = MockSubmitEndpoint::new();
        endpoint
            .expect_poll()
            .times(1)
            .returning(|| Err(SubmitError::Transport("connection refused".to_string())));

        let mut controller = controller(source, sink, endpoint, PollConfig::default());
        let outcome = controller.submit().await;
        assert!(matches!(outcome, SubmissionState::Failed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_attempts_bounds_the_poll_loop() {
        let source = source_with(valid_data());

        let mut sink = MockResultSink::new();
        sink.expect_clear_errors().times(1).return_const(());
        sink.expect_show_progress().times(2).return_const(());
        sink.expect_show_error()
            .withf(|reason| reason.contains("2 poll attempts"))
            .times(1)
            .return_const(());

        let mut endpoint = MockSubmitEndpoint::new();
        endpoint
            .expect_poll()
            .times(2)
            .returning(|| Ok(SubmissionStatus::Progress { timeout: 1 }));

        let poll = PollConfig {
            max_attempts: Some(2),
            max_duration: None,
        };
        let mut controller = controller(source, sink, endpoint, poll);
        let outcome = controller.submit().await;
        assert!(matches!(outcome, SubmissionState::Failed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_suppresses_further_polls() {
        let source = source_with(valid_data());

        let mut sink = MockResultSink::new();
        sink.expect_clear_errors().times(1).return_const(());
        sink.expect_show_progress().times(1).return_const(());

        let token = CancellationToken::new();
        let mut endpoint = MockSubmitEndpoint::new();
        let poller_token = token.clone();
        endpoint.expect_poll().times(1).returning(move || {
            // Cancelled while the server still reports progress
            poller_token.cancel();
            Ok(SubmissionStatus::Progress { timeout: 10 })
        });

        let mut controller = controller(source, sink, endpoint, PollConfig::default());
        controller.cancel = token;
        let outcome = controller.submit().await;

        assert_eq!(outcome, SubmissionState::Cancelled);
        assert_eq!(controller.state(), &SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_before_the_first_poll() {
        let source = source_with(valid_data());

        let mut sink = MockResultSink::new();
        sink.expect_clear_errors().times(1).return_const(());

        let endpoint = MockSubmitEndpoint::new();

        let mut controller = controller(source, sink, endpoint, PollConfig::default());
        controller.cancellation_token().cancel();
        let outcome = controller.submit().await;
        assert_eq!(outcome, SubmissionState::Cancelled);
    }
}
