//! Outbound notifications: the email-delivery collaborator and the
//! two-stage pipeline that drives it on submission.

pub mod emailjs;
pub mod pipeline;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::NotifyError;

pub use emailjs::EmailJsNotifier;
pub use pipeline::{DeliveryPipeline, DeliveryReceipt, DeliveryStage, TemplateIds};

/// Flat template parameters: field name to string value.
pub type TemplatePayload = BTreeMap<String, String>;

/// A templated email delivery service.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Provider name, for logs and errors.
    fn name(&self) -> &str;

    /// Send one templated email. Called once per stage, never retried here.
    async fn send(&self, template_id: &str, payload: &TemplatePayload) -> Result<(), NotifyError>;
}
