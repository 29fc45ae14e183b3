//! Field validation for each form boundary.
//!
//! - Shipment form: weight, volume and cargo ready date present; weight and
//!   volume at or above their minimums.
//! - Step 1: full name present, business email accepted by [`EmailPolicy`].
//! - Step 2: company name and contact number present.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::config::QuoteConfig;
use crate::error::ValidationError;

use super::model::QuoteRequestDraft;
use super::state::ContactStep;

/// One "@", a "." somewhere in the domain, no whitespace.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Accepts well-formed addresses on non-consumer domains.
#[derive(Debug, Clone)]
pub struct EmailPolicy {
    blocked_domains: HashSet<String>,
}

impl EmailPolicy {
    pub fn new<I, S>(blocked_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocked_domains: blocked_domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Whether the address matches the basic `local@domain.tld` shape.
    pub fn is_well_formed(email: &str) -> bool {
        EMAIL_PATTERN.is_match(email)
    }

    /// Whether the domain belongs to a blocked consumer provider.
    ///
    /// A fully qualified domain (`gmail.com.`) matches its plain form.
    pub fn is_blocked_domain(&self, domain: &str) -> bool {
        let domain = domain.strip_suffix('.').unwrap_or(domain);
        self.blocked_domains.contains(&domain.to_ascii_lowercase())
    }

    pub fn accepts(&self, email: &str) -> bool {
        let email = email.trim();
        if !Self::is_well_formed(email) {
            return false;
        }
        match email.rsplit_once('@') {
            Some((_, domain)) => !self.is_blocked_domain(domain),
            None => false,
        }
    }
}

/// Validates a draft against the configured minimums and email policy.
#[derive(Debug, Clone)]
pub struct DraftValidator {
    min_weight_kg: Decimal,
    min_volume_cbm: Decimal,
    email_policy: EmailPolicy,
}

impl DraftValidator {
    pub fn new(config: &QuoteConfig) -> Self {
        Self {
            min_weight_kg: config.min_weight_kg,
            min_volume_cbm: config.min_volume_cbm,
            email_policy: EmailPolicy::new(&config.blocked_email_domains),
        }
    }

    pub fn email_policy(&self) -> &EmailPolicy {
        &self.email_policy
    }

    /// Checks run before the contact dialog opens.
    pub fn validate_shipment(&self, draft: &QuoteRequestDraft) -> Result<(), ValidationError> {
        if is_blank(&draft.weight) || is_blank(&draft.volume) || is_blank(&draft.cargo_ready_date)
        {
            return Err(ValidationError::MissingShipmentFields);
        }

        let weight = parse_amount(&draft.weight, "Weight")?;
        if weight < self.min_weight_kg {
            return Err(ValidationError::WeightBelowMinimum {
                minimum: self.min_weight_kg,
            });
        }

        let volume = parse_amount(&draft.volume, "Volume")?;
        if volume < self.min_volume_cbm {
            return Err(ValidationError::VolumeBelowMinimum {
                minimum: self.min_volume_cbm,
            });
        }

        Ok(())
    }

    /// Checks for one page of the contact dialog.
    pub fn validate_step(
        &self,
        draft: &QuoteRequestDraft,
        step: ContactStep,
    ) -> Result<(), ValidationError> {
        match step {
            ContactStep::Personal => {
                if is_blank(&draft.full_name) {
                    return Err(ValidationError::MissingFullName);
                }
                if !self.email_policy.accepts(&draft.email) {
                    return Err(ValidationError::InvalidEmail);
                }
            }
            ContactStep::Company => {
                if is_blank(&draft.company_name) {
                    return Err(ValidationError::MissingCompanyName);
                }
                if is_blank(&draft.contact_number) {
                    return Err(ValidationError::MissingContactNumber);
                }
            }
        }
        Ok(())
    }

    /// Every check, in form order. Gate for entering `Sending`.
    pub fn validate_all(&self, draft: &QuoteRequestDraft) -> Result<(), ValidationError> {
        self.validate_shipment(draft)?;
        self.validate_step(draft, ContactStep::Personal)?;
        self.validate_step(draft, ContactStep::Company)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse a numeric input. Accepts plain and scientific notation.
///
/// Finite numbers outside the `Decimal` range saturate to `Decimal::MAX`
/// or `Decimal::MIN`, so they still compare correctly against a minimum.
fn parse_amount(raw: &str, field: &'static str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| saturating_from_float(trimmed))
        .ok_or(ValidationError::NotANumber { field })
}

fn saturating_from_float(raw: &str) -> Option<Decimal> {
    let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Decimal::from_f64(value).or(Some(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::model::DraftField;

    fn validator() -> DraftValidator {
        DraftValidator::new(&QuoteConfig::default())
    }

    fn shipment(weight: &str, volume: &str, date: &str) -> QuoteRequestDraft {
        let mut draft = QuoteRequestDraft::new("Heathrow", "Johannesburg");
        draft.set(DraftField::Weight, weight);
        draft.set(DraftField::Volume, volume);
        draft.set(DraftField::CargoReadyDate, date);
        draft
    }

    #[test]
    fn weight_below_minimum_is_rejected() {
        for weight in ["44", "44.99", "0", "-50", "1e1"] {
            let err = validator()
                .validate_shipment(&shipment(weight, "1", "2024-05-01"))
                .unwrap_err();
            assert!(
                matches!(err, ValidationError::WeightBelowMinimum { .. }),
                "weight {weight} gave {err:?}"
            );
        }
    }

    #[test]
    fn weight_boundary_is_inclusive() {
        for weight in ["45", "45.0", " 45 ", "4.5e1", "1000"] {
            assert!(
                validator().validate_shipment(&shipment(weight, "1", "2024-05-01")).is_ok(),
                "weight {weight} should pass"
            );
        }
    }

    #[test]
    fn weight_message_matches_form_copy() {
        let err = validator()
            .validate_shipment(&shipment("44", "1", "2024-05-01"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Weight must be at least 45 kg");
    }

    #[test]
    fn volume_boundary() {
        for volume in ["0.99", "0", "-1"] {
            let err = validator()
                .validate_shipment(&shipment("45", volume, "2024-05-01"))
                .unwrap_err();
            assert!(matches!(err, ValidationError::VolumeBelowMinimum { .. }));
        }
        assert!(validator().validate_shipment(&shipment("45", "1", "2024-05-01")).is_ok());
        assert!(validator().validate_shipment(&shipment("45", "1.00", "2024-05-01")).is_ok());
        assert_eq!(
            validator()
                .validate_shipment(&shipment("45", "0.5", "2024-05-01"))
                .unwrap_err()
                .to_string(),
            "Volume must be at least 1 m³"
        );
    }

    #[test]
    fn missing_shipment_fields() {
        let cases = [("", "1", "2024-05-01"), ("45", "  ", "2024-05-01"), ("45", "1", "")];
        for (w, v, d) in cases {
            assert_eq!(
                validator().validate_shipment(&shipment(w, v, d)),
                Err(ValidationError::MissingShipmentFields)
            );
        }
    }

    #[test]
    fn non_numeric_amounts() {
        assert_eq!(
            validator().validate_shipment(&shipment("heavy", "1", "2024-05-01")),
            Err(ValidationError::NotANumber { field: "Weight" })
        );
        assert_eq!(
            validator().validate_shipment(&shipment("45", "1m3", "2024-05-01")),
            Err(ValidationError::NotANumber { field: "Volume" })
        );
    }

    #[test]
    fn amounts_beyond_decimal_range_still_compare() {
        for weight in ["100000000000000000000000000000", "1e30", "1E300"] {
            assert!(
                validator().validate_shipment(&shipment(weight, "1", "2024-05-01")).is_ok(),
                "weight {weight} should pass"
            );
        }
        assert!(validator().validate_shipment(&shipment("45", "1e30", "2024-05-01")).is_ok());

        for weight in ["-100000000000000000000000000000", "-1e30"] {
            assert!(matches!(
                validator().validate_shipment(&shipment(weight, "1", "2024-05-01")),
                Err(ValidationError::WeightBelowMinimum { .. })
            ));
        }
    }

    #[test]
    fn non_finite_amounts_are_not_numbers() {
        for weight in ["inf", "-infinity", "NaN", "1e999"] {
            assert_eq!(
                validator().validate_shipment(&shipment(weight, "1", "2024-05-01")),
                Err(ValidationError::NotANumber { field: "Weight" }),
                "weight {weight}"
            );
        }
    }

    #[test]
    fn malformed_emails_are_rejected() {
        let policy = EmailPolicy::new(["gmail.com"]);
        for email in [
            "",
            "jane",
            "jane.acme.co",
            "jane@acme",
            "jane@@acme.co",
            "jane doe@acme.co",
            "jane@ac me.co",
            "@acme.co",
            "jane@.",
        ] {
            assert!(!policy.accepts(email), "{email:?} should be rejected");
        }
    }

    #[test]
    fn business_emails_are_accepted() {
        let policy = EmailPolicy::new(["gmail.com"]);
        for email in ["jane@acme.co", "ops.team@freight.example.co.uk", "  jane@acme.co  "] {
            assert!(policy.accepts(email), "{email:?} should be accepted");
        }
    }

    #[test]
    fn blocked_domains_match_case_insensitively() {
        let v = validator();
        for email in ["user@Gmail.com", "user@GMAIL.COM", "user@hotmail.co.uk", "x@yahoo.com"] {
            assert!(!v.email_policy().accepts(email), "{email} should be blocked");
        }
        // Subdomains of a blocked provider are a different domain.
        assert!(v.email_policy().accepts("user@corp.gmail.com.example"));
    }

    #[test]
    fn fully_qualified_blocked_domain_is_rejected() {
        let v = validator();
        for email in ["user@gmail.com.", "user@Gmail.Com.", "x@yahoo.com."] {
            assert!(!v.email_policy().accepts(email), "{email} should be blocked");
        }
        assert!(v.email_policy().is_blocked_domain("gmail.com."));
        assert!(v.email_policy().accepts("jane@acme.co."));
    }

    #[test]
    fn step_one_requires_name_and_business_email() {
        let v = validator();
        let mut draft = shipment("45", "1", "2024-05-01");
        draft.set(DraftField::Email, "jane@acme.co");
        assert_eq!(
            v.validate_step(&draft, ContactStep::Personal),
            Err(ValidationError::MissingFullName)
        );

        draft.set(DraftField::FullName, "Jane Doe");
        draft.set(DraftField::Email, "jane@gmail.com");
        assert_eq!(
            v.validate_step(&draft, ContactStep::Personal),
            Err(ValidationError::InvalidEmail)
        );

        draft.set(DraftField::Email, "jane@acme.co");
        assert!(v.validate_step(&draft, ContactStep::Personal).is_ok());
    }

    #[test]
    fn step_two_requires_company_and_number() {
        let v = validator();
        let mut draft = shipment("45", "1", "2024-05-01");
        assert_eq!(
            v.validate_step(&draft, ContactStep::Company),
            Err(ValidationError::MissingCompanyName)
        );
        draft.set(DraftField::CompanyName, "Acme");
        assert_eq!(
            v.validate_step(&draft, ContactStep::Company),
            Err(ValidationError::MissingContactNumber)
        );
        draft.set(DraftField::ContactNumber, "+441234567890");
        assert!(v.validate_step(&draft, ContactStep::Company).is_ok());
    }

    #[test]
    fn validate_all_reports_first_failure_in_form_order() {
        let v = validator();
        let mut draft = shipment("44", "1", "2024-05-01");
        assert!(matches!(
            v.validate_all(&draft),
            Err(ValidationError::WeightBelowMinimum { .. })
        ));
        draft.set(DraftField::Weight, "45");
        assert_eq!(v.validate_all(&draft), Err(ValidationError::MissingFullName));
    }
}
