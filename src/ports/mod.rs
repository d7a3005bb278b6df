//! Port traits for the UI and network collaborators

mod traits;

pub use traits::{FormDataSource, ResultSink, SubmitEndpoint};

#[cfg(test)]
pub use traits::{MockFormDataSource, MockResultSink, MockSubmitEndpoint};
