//! Two-stage delivery: business notification, then user confirmation.
//!
//! The confirmation stage only starts once the business stage has reported
//! success. Either failure surfaces as the same [`DeliveryError`]; there is
//! no partial-success state, so a retry sends both emails again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DeliveryError;
use crate::quote::QuoteRequestDraft;

use super::{Notifier, TemplatePayload};

/// Template ids for the two stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIds {
    pub business: String,
    pub confirmation: String,
}

/// One of the two sequential send calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStage {
    BusinessNotification,
    UserConfirmation,
}

impl DeliveryStage {
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::BusinessNotification => Some(Self::UserConfirmation),
            Self::UserConfirmation => None,
        }
    }
}

impl std::fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BusinessNotification => "business_notification",
            Self::UserConfirmation => "user_confirmation",
        };
        write!(f, "{s}")
    }
}

/// Proof that both stages were accepted by the notifier.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReceipt {
    pub session_id: Uuid,
    pub delivered_at: DateTime<Utc>,
}

/// Drives a [`Notifier`] through both stages for a draft.
#[derive(Clone)]
pub struct DeliveryPipeline {
    notifier: Arc<dyn Notifier>,
    templates: TemplateIds,
}

impl DeliveryPipeline {
    pub fn new(notifier: Arc<dyn Notifier>, templates: TemplateIds) -> Self {
        Self {
            notifier,
            templates,
        }
    }

    /// Template id and payload for a stage.
    fn stage_request<'a>(
        &'a self,
        stage: DeliveryStage,
        draft: &QuoteRequestDraft,
    ) -> (&'a str, TemplatePayload) {
        match stage {
            DeliveryStage::BusinessNotification => {
                (self.templates.business.as_str(), draft.business_payload())
            }
            DeliveryStage::UserConfirmation => {
                (self.templates.confirmation.as_str(), draft.confirmation_payload())
            }
        }
    }

    /// Run both stages in order, stopping at the first failure.
    pub async fn deliver(
        &self,
        session_id: Uuid,
        draft: &QuoteRequestDraft,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let mut stage = Some(DeliveryStage::BusinessNotification);

        while let Some(current) = stage {
            let (template_id, payload) = self.stage_request(current, draft);
            tracing::debug!(
                %session_id,
                stage = %current,
                template_id,
                provider = self.notifier.name(),
                "Sending quote email"
            );

            if let Err(e) = self.notifier.send(template_id, &payload).await {
                tracing::warn!(
                    %session_id,
                    stage = %current,
                    provider = self.notifier.name(),
                    error = %e,
                    "Quote email delivery failed"
                );
                return Err(DeliveryError {
                    stage: current,
                    reason: e.to_string(),
                });
            }

            stage = current.next();
        }

        tracing::info!(%session_id, "Quote request delivered");
        Ok(DeliveryReceipt {
            session_id,
            delivered_at: Utc::now(),
        })
    }
}
