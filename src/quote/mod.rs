//! Quote request wizard for the airfreight rate-quote form.
//!
//! The user fills in shipment parameters, requests a rate, then completes a
//! two-step contact dialog. The last step submits the draft through the
//! delivery pipeline and the wizard reflects the outcome.

pub mod model;
pub mod state;
pub mod validation;
pub mod wizard;

pub use model::{DraftField, QuoteRequestDraft, UnknownField};
pub use state::{ContactStep, SubmissionStatus};
pub use validation::{DraftValidator, EmailPolicy};
pub use wizard::{QuoteWizard, StepOutcome};
