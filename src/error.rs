//! Error types for the quote request wizard.

use rust_decimal::Decimal;

use crate::notify::DeliveryStage;
use crate::quote::{ContactStep, SubmissionStatus};

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Delivery(#[from] DeliveryError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Field validation failures. The display text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in the weight, volume and cargo ready date.")]
    MissingShipmentFields,

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("Weight must be at least {minimum} kg")]
    WeightBelowMinimum { minimum: Decimal },

    #[error("Volume must be at least {minimum} m³")]
    VolumeBelowMinimum { minimum: Decimal },

    #[error("Please enter your full name.")]
    MissingFullName,

    #[error("Please enter a valid business email address.")]
    InvalidEmail,

    #[error("Please enter your company name.")]
    MissingCompanyName,

    #[error("Please enter your contact number.")]
    MissingContactNumber,
}

/// Failure of either delivery stage.
///
/// The display text is the same for both stages; `stage` and `reason`
/// are for logs.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to send the email. Please try again.")]
pub struct DeliveryError {
    pub stage: DeliveryStage,
    pub reason: String,
}

/// Errors from a single notifier call.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Request to {provider} failed: {reason}")]
    Transport { provider: String, reason: String },

    #[error("{provider} rejected the request with status {status}: {body}")]
    Rejected {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Wizard operations invoked from the wrong state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("Expected step {expected}, got step {got}")]
    StepMismatch {
        expected: ContactStep,
        got: ContactStep,
    },

    #[error("The contact details dialog is not open")]
    DialogClosed,
}

/// Result type alias for the wizard.
pub type Result<T> = std::result::Result<T, Error>;
