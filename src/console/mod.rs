//! Terminal rendering of the quote form.

pub mod confetti;
pub mod form;

pub use form::{ConsoleForm, FormOutcome};
