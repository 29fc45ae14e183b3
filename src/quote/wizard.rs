//! QuoteWizard owns the draft, gates each boundary on validation, and
//! drives the delivery pipeline on the final step.

use tokio::sync::watch;
use uuid::Uuid;

use crate::config::QuoteConfig;
use crate::error::{Error, Result, ValidationError, WizardError};
use crate::notify::{DeliveryPipeline, DeliveryReceipt};

use super::model::{DraftField, QuoteRequestDraft};
use super::state::{ContactStep, SubmissionStatus};
use super::validation::DraftValidator;

/// Result of a successful `advance_step`.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// Moved to the given dialog step.
    Advanced(ContactStep),
    /// Final step passed and both emails were delivered.
    Submitted(DeliveryReceipt),
}

/// One quote request session: the draft plus its dialog and submission state.
pub struct QuoteWizard {
    session_id: Uuid,
    validator: DraftValidator,
    pipeline: DeliveryPipeline,
    draft: QuoteRequestDraft,
    step: ContactStep,
    status: SubmissionStatus,
    status_tx: watch::Sender<SubmissionStatus>,
    dialog_open: bool,
    confirmation_visible: bool,
    celebration_pending: bool,
    error: Option<String>,
}

impl QuoteWizard {
    pub fn new(config: &QuoteConfig, pipeline: DeliveryPipeline) -> Self {
        let (status_tx, _) = watch::channel(SubmissionStatus::Idle);
        Self {
            session_id: Uuid::new_v4(),
            validator: DraftValidator::new(config),
            pipeline,
            draft: QuoteRequestDraft::new(&config.origin, &config.destination),
            step: ContactStep::Personal,
            status: SubmissionStatus::Idle,
            status_tx,
            dialog_open: false,
            confirmation_visible: false,
            celebration_pending: false,
            error: None,
        }
    }

    // ── View state ──────────────────────────────────────────────────

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn draft(&self) -> &QuoteRequestDraft {
        &self.draft
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn current_step(&self) -> ContactStep {
        self.step
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn confirmation_visible(&self) -> bool {
        self.confirmation_visible
    }

    /// Inline message from the last failed validation or delivery.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a loading indicator should be shown.
    pub fn is_sending(&self) -> bool {
        self.status == SubmissionStatus::Sending
    }

    /// Watch status changes, e.g. to show a spinner while sending.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status_tx.subscribe()
    }

    /// Returns true once after a successful submission.
    pub fn take_celebration(&mut self) -> bool {
        std::mem::take(&mut self.celebration_pending)
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Set one field. No validation, no status change.
    pub fn update_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
        tracing::trace!(session_id = %self.session_id, %field, "Field updated");
    }

    /// Validate the shipment form and open the contact dialog.
    pub fn request_rate(&mut self) -> Result<()> {
        let target = SubmissionStatus::AwaitingEmailStep;
        if self.status != target && !self.status.can_transition_to(target) {
            return Err(WizardError::InvalidTransition {
                from: self.status,
                to: target,
            }
            .into());
        }

        if let Err(e) = self.validator.validate_shipment(&self.draft) {
            return Err(self.reject(e));
        }

        if self.status != target {
            self.transition(target)?;
        }
        if !self.dialog_open {
            self.step = ContactStep::Personal;
            self.dialog_open = true;
        }
        self.error = None;
        tracing::info!(session_id = %self.session_id, "Rate requested, contact dialog opened");
        Ok(())
    }

    /// Validate `step` and move past it. The last step submits the draft.
    pub async fn advance_step(&mut self, step: ContactStep) -> Result<StepOutcome> {
        if !self.dialog_open {
            return Err(WizardError::DialogClosed.into());
        }
        if step != self.step {
            return Err(WizardError::StepMismatch {
                expected: self.step,
                got: step,
            }
            .into());
        }

        if let Err(e) = self.validator.validate_step(&self.draft, step) {
            return Err(self.reject(e));
        }

        match step.next() {
            Some(next) => {
                self.step = next;
                self.error = None;
                tracing::debug!(session_id = %self.session_id, step = %next, "Advanced dialog step");
                Ok(StepOutcome::Advanced(next))
            }
            None => self.submit().await.map(StepOutcome::Submitted),
        }
    }

    /// Go back one dialog step, keeping what was entered.
    pub fn back_step(&mut self) -> Result<ContactStep> {
        if !self.dialog_open {
            return Err(WizardError::DialogClosed.into());
        }
        let Some(previous) = self.step.previous() else {
            return Ok(self.step);
        };
        if self.status == SubmissionStatus::Failed {
            self.transition(SubmissionStatus::AwaitingEmailStep)?;
        }
        self.step = previous;
        self.error = None;
        Ok(previous)
    }

    /// Send both emails for the current draft.
    ///
    /// Every field is validated again before entering `Sending`. On failure
    /// the dialog stays open and the draft is kept for a retry.
    pub async fn submit(&mut self) -> Result<DeliveryReceipt> {
        let target = SubmissionStatus::Sending;
        if !self.status.can_transition_to(target) {
            return Err(WizardError::InvalidTransition {
                from: self.status,
                to: target,
            }
            .into());
        }

        if let Err(e) = self.validator.validate_all(&self.draft) {
            return Err(self.reject(e));
        }

        self.transition(target)?;
        self.error = None;
        tracing::info!(
            session_id = %self.session_id,
            email_domain = %self.draft.email_domain().unwrap_or_default(),
            "Submitting quote request"
        );

        match self.pipeline.deliver(self.session_id, &self.draft).await {
            Ok(receipt) => {
                self.transition(SubmissionStatus::Succeeded)?;
                self.dialog_open = false;
                self.confirmation_visible = true;
                self.celebration_pending = true;
                Ok(receipt)
            }
            Err(e) => {
                self.transition(SubmissionStatus::Failed)?;
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Submit again after a delivery failure. Both emails are re-sent.
    pub async fn retry(&mut self) -> Result<DeliveryReceipt> {
        if self.status != SubmissionStatus::Failed {
            return Err(WizardError::InvalidTransition {
                from: self.status,
                to: SubmissionStatus::Sending,
            }
            .into());
        }
        tracing::info!(session_id = %self.session_id, "Retrying quote delivery");
        self.submit().await
    }

    /// Close the contact dialog. The draft is kept.
    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
        self.step = ContactStep::Personal;
        self.error = None;
        self.reset_status();
    }

    /// Hide the thank-you view.
    pub fn dismiss_confirmation(&mut self) {
        self.confirmation_visible = false;
        self.celebration_pending = false;
        self.reset_status();
    }

    /// Discard the draft and start a new session.
    pub fn reset(&mut self) {
        self.draft.clear();
        self.session_id = Uuid::new_v4();
        self.step = ContactStep::Personal;
        self.dialog_open = false;
        self.confirmation_visible = false;
        self.celebration_pending = false;
        self.error = None;
        self.reset_status();
    }

    // ── Internals ───────────────────────────────────────────────────

    fn transition(&mut self, target: SubmissionStatus) -> std::result::Result<(), WizardError> {
        if !self.status.can_transition_to(target) {
            return Err(WizardError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        tracing::debug!(
            session_id = %self.session_id,
            from = %self.status,
            to = %target,
            "Submission status changed"
        );
        self.status = target;
        self.status_tx.send_replace(target);
        Ok(())
    }

    /// Every active status may return to `Idle`.
    fn reset_status(&mut self) {
        if self.status == SubmissionStatus::Idle {
            return;
        }
        if let Err(e) = self.transition(SubmissionStatus::Idle) {
            tracing::warn!(session_id = %self.session_id, "Failed to reset status: {}", e);
        }
    }

    /// Record a validation failure as the inline message.
    fn reject(&mut self, e: ValidationError) -> Error {
        tracing::debug!(session_id = %self.session_id, reason = %e, "Validation failed");
        self.error = Some(e.to_string());
        e.into()
    }
}
