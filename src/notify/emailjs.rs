//! EmailJS notifier: sends templated emails via the EmailJS REST API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::EmailJsConfig;
use crate::error::NotifyError;

use super::{Notifier, TemplateIds, TemplatePayload};

const PROVIDER: &str = "emailjs";

/// Request body for `POST /api/v1.0/email/send`.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplatePayload,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

/// EmailJS REST client.
pub struct EmailJsNotifier {
    api_url: String,
    service_id: String,
    public_key: String,
    access_token: Option<SecretString>,
    client: reqwest::Client,
}

impl EmailJsNotifier {
    pub fn new(config: &EmailJsConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            service_id: config.service_id.clone(),
            public_key: config.public_key.clone(),
            access_token: config.access_token.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Template ids configured alongside the credentials.
    pub fn template_ids(config: &EmailJsConfig) -> TemplateIds {
        TemplateIds {
            business: config.business_template_id.clone(),
            confirmation: config.confirmation_template_id.clone(),
        }
    }

    fn request_body<'a>(
        &'a self,
        template_id: &'a str,
        payload: &'a TemplatePayload,
    ) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.service_id,
            template_id,
            user_id: &self.public_key,
            template_params: payload,
            access_token: self.access_token.as_ref().map(|t| t.expose_secret()),
        }
    }
}

#[async_trait]
impl Notifier for EmailJsNotifier {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn send(&self, template_id: &str, payload: &TemplatePayload) -> Result<(), NotifyError> {
        let body = self.request_body(template_id, payload);

        let resp = self
            .client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(template_id, "EmailJS accepted message");
            return Ok(());
        }

        let body = resp.text().await.map_err(|e| NotifyError::InvalidResponse {
            provider: PROVIDER.into(),
            reason: e.to_string(),
        })?;
        Err(NotifyError::Rejected {
            provider: PROVIDER.into(),
            status: status.as_u16(),
            body,
        })
    }
}
