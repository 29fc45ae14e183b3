//! Configuration types.

use std::path::PathBuf;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;

use crate::error::ConfigError;

/// Default EmailJS REST endpoint.
pub const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Consumer email providers rejected at step 1. Quotes need a business address.
pub const DEFAULT_BLOCKED_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "yahoo.co.uk",
    "hotmail.com",
    "hotmail.co.uk",
    "outlook.com",
    "live.com",
    "msn.com",
    "aol.com",
    "icloud.com",
    "me.com",
    "mail.com",
    "gmx.com",
    "protonmail.com",
    "proton.me",
    "yandex.com",
    "zoho.com",
];

/// Lane and validation settings for the quote form.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Fixed origin airport shown read-only on the form.
    pub origin: String,
    /// Fixed destination airport shown read-only on the form.
    pub destination: String,
    /// Minimum chargeable weight in kg (inclusive).
    pub min_weight_kg: Decimal,
    /// Minimum volume in m³ (inclusive).
    pub min_volume_cbm: Decimal,
    /// Lower-cased email domains that are not accepted.
    pub blocked_email_domains: Vec<String>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            origin: "Heathrow".to_string(),
            destination: "Johannesburg".to_string(),
            min_weight_kg: dec!(45),
            min_volume_cbm: dec!(1),
            blocked_email_domains: DEFAULT_BLOCKED_EMAIL_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl QuoteConfig {
    /// Build from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `QUOTE_EXTRA_BLOCKED_DOMAINS`
    /// adds comma-separated domains to the default blocked list.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let extra = lookup("QUOTE_EXTRA_BLOCKED_DOMAINS").unwrap_or_default();
        for domain in extra
            .split(',')
            .map(|s| s.trim().trim_start_matches('@').to_ascii_lowercase())
            .filter(|s| !s.is_empty())
        {
            if !config.blocked_email_domains.contains(&domain) {
                config.blocked_email_domains.push(domain);
            }
        }
        config
    }
}

/// EmailJS credentials and template ids.
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub api_url: String,
    pub service_id: String,
    /// Template for the business notification email.
    pub business_template_id: String,
    /// Template for the confirmation email sent to the requester.
    pub confirmation_template_id: String,
    /// Public key, sent as `user_id`.
    pub public_key: String,
    /// Private key, sent as `accessToken` when set.
    pub access_token: Option<SecretString>,
}

impl EmailJsConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let api_url = lookup("EMAILJS_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_EMAILJS_API_URL.to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "EMAILJS_API_URL".to_string(),
                message: format!("expected an http(s) URL, got {api_url:?}"),
            });
        }

        Ok(Self {
            api_url,
            service_id: required("EMAILJS_SERVICE_ID")?,
            business_template_id: required("EMAILJS_BUSINESS_TEMPLATE_ID")?,
            confirmation_template_id: required("EMAILJS_CONFIRMATION_TEMPLATE_ID")?,
            public_key: required("EMAILJS_PUBLIC_KEY")?,
            access_token: lookup("EMAILJS_ACCESS_TOKEN")
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from),
        })
    }
}

/// Where tracing output goes.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Directory for a daily-rolling log file. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            log_dir: std::env::var("QUOTE_LOG_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
