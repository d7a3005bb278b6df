//! Formflow - client-side form validation and submission tracking
//!
//! Validates a fixed three-field form (fio, email, phone) and drives an
//! asynchronous submission against a polling endpoint until the server
//! reports a terminal outcome. The UI and the network sit behind port
//! traits so the whole lifecycle can be exercised without either.

pub mod config;
pub mod controller;
pub mod endpoint;
pub mod error;
pub mod ports;
pub mod state;
pub mod validation;

pub use config::{Config, PollConfig};
pub use controller::{CancellationToken, SubmissionController};
pub use endpoint::HttpEndpoint;
pub use error::SubmitError;
pub use ports::{FormDataSource, ResultSink, SubmitEndpoint};
pub use state::{FieldName, FormData, SubmissionState, SubmissionStatus};
pub use validation::{ValidationConfig, ValidationResult, Validator};
