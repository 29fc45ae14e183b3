//! Quote request draft and the fields a user can edit.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::notify::TemplatePayload;

/// A user-editable field on the draft.
///
/// Origin and destination are fixed by the lane and are not fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Weight,
    Volume,
    CargoReadyDate,
    FullName,
    Email,
    CompanyName,
    ContactNumber,
}

impl DraftField {
    pub fn all() -> &'static [DraftField] {
        &[
            Self::Weight,
            Self::Volume,
            Self::CargoReadyDate,
            Self::FullName,
            Self::Email,
            Self::CompanyName,
            Self::ContactNumber,
        ]
    }

    /// Key used in the business notification template.
    pub fn template_key(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Volume => "volume",
            Self::CargoReadyDate => "cargoReadyDate",
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::CompanyName => "companyName",
            Self::ContactNumber => "contactNumber",
        }
    }

    /// Human-readable label, as shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weight => "Weight (kg)",
            Self::Volume => "Volume (m³)",
            Self::CargoReadyDate => "Cargo ready date",
            Self::FullName => "Full name",
            Self::Email => "Business email",
            Self::CompanyName => "Company name",
            Self::ContactNumber => "Contact number",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Weight => "weight",
            Self::Volume => "volume",
            Self::CargoReadyDate => "cargo_ready_date",
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::CompanyName => "company_name",
            Self::ContactNumber => "contact_number",
        };
        write!(f, "{s}")
    }
}

/// Returned when a field name does not match any editable field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown or read-only field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for DraftField {
    type Err = UnknownField;

    /// Accepts snake_case and camelCase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|field| field.to_string() == trimmed || field.template_key() == trimmed)
            .ok_or_else(|| UnknownField(trimmed.to_string()))
    }
}

/// The in-progress, client-held quote request.
///
/// Values are stored exactly as entered; parsing happens at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestDraft {
    origin: String,
    destination: String,
    pub weight: String,
    pub volume: String,
    pub cargo_ready_date: String,
    pub full_name: String,
    pub email: String,
    pub company_name: String,
    pub contact_number: String,
}

impl QuoteRequestDraft {
    /// Empty draft on a fixed lane.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            weight: String::new(),
            volume: String::new(),
            cargo_ready_date: String::new(),
            full_name: String::new(),
            email: String::new(),
            company_name: String::new(),
            contact_number: String::new(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Weight => &self.weight,
            DraftField::Volume => &self.volume,
            DraftField::CargoReadyDate => &self.cargo_ready_date,
            DraftField::FullName => &self.full_name,
            DraftField::Email => &self.email,
            DraftField::CompanyName => &self.company_name,
            DraftField::ContactNumber => &self.contact_number,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Weight => &mut self.weight,
            DraftField::Volume => &mut self.volume,
            DraftField::CargoReadyDate => &mut self.cargo_ready_date,
            DraftField::FullName => &mut self.full_name,
            DraftField::Email => &mut self.email,
            DraftField::CompanyName => &mut self.company_name,
            DraftField::ContactNumber => &mut self.contact_number,
        };
        *slot = value.into();
    }

    /// Clear every editable field, keeping the lane.
    pub fn clear(&mut self) {
        *self = Self::new(std::mem::take(&mut self.origin), std::mem::take(&mut self.destination));
    }

    /// Domain part of the email, lower-cased, for logging.
    pub fn email_domain(&self) -> Option<String> {
        self.email
            .trim()
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_ascii_lowercase())
    }

    /// Payload for the business notification: the lane plus every field.
    pub fn business_payload(&self) -> TemplatePayload {
        let mut payload = TemplatePayload::new();
        payload.insert("origin".to_string(), self.origin.clone());
        payload.insert("destination".to_string(), self.destination.clone());
        for field in DraftField::all() {
            payload.insert(field.template_key().to_string(), self.get(*field).to_string());
        }
        payload
    }

    /// Payload for the confirmation sent to the requester: only their address.
    pub fn confirmation_payload(&self) -> TemplatePayload {
        let mut payload = TemplatePayload::new();
        payload.insert("user_email".to_string(), self.email.clone());
        payload
    }
}
