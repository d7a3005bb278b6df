//! Form and submission state module

mod field;
mod submission;

pub use field::*;
pub use submission::*;
