use serde::{Deserialize, Serialize};

use crate::forms::validation::{require, require_email, ValidationError};

/// Payload posted by the new-patient consent form.
///
/// Every field defaults so a missing key surfaces as a validation error
/// rather than a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentFormSubmission {
    pub title: String,
    pub given_names: String,
    pub surname: String,
    pub preferred_name: String,
    pub date_of_birth: String,
    pub gender: String,

    pub email: String,
    pub phone: String,
    pub home_phone: String,

    pub address: String,
    pub suburb: String,
    pub state: String,
    pub postcode: String,

    pub medicare_number: String,
    pub reference_number: String,
    pub expiry_date: String,
    pub dva_number: String,
    pub health_fund: String,
    pub health_fund_number: String,

    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relationship: String,

    pub allergies: String,
    pub medical_conditions: String,
    pub previous_surgeries: String,
    pub smoker: Option<bool>,
    pub medications: Vec<Medication>,

    pub non_consent: bool,
    pub signature: String,
    pub signature_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
}

impl ConsentFormSubmission {
    /// Checks the required field set shared with the browser form.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        require(&mut missing, "givenNames", &self.given_names);
        require(&mut missing, "surname", &self.surname);
        require(&mut missing, "email", &self.email);
        require(&mut missing, "dateOfBirth", &self.date_of_birth);
        require(&mut missing, "address", &self.address);
        require(&mut missing, "phone", &self.phone);
        require(&mut missing, "medicareNumber", &self.medicare_number);
        require(&mut missing, "referenceNumber", &self.reference_number);
        require(&mut missing, "expiryDate", &self.expiry_date);
        require(&mut missing, "signature", &self.signature);
        require(&mut missing, "signatureDate", &self.signature_date);

        if !missing.is_empty() {
            return Err(ValidationError::MissingRequiredFields(missing));
        }

        require_email(&self.email)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names.trim(), self.surname.trim())
    }

    /// `Consent_Form_<given>_<surname>.pdf`, safe to use as a file name.
    pub fn attachment_name(&self) -> String {
        format!(
            "Consent_Form_{}_{}.pdf",
            file_name_part(&self.given_names),
            file_name_part(&self.surname)
        )
    }
}

fn file_name_part(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_deserialize_to_defaults() {
        let submission: ConsentFormSubmission =
            serde_json::from_str(r#"{"givenNames":"Jane","nonConsent":true}"#)
                .expect("partial payload deserializes");
        assert_eq!(submission.given_names, "Jane");
        assert!(submission.surname.is_empty());
        assert!(submission.non_consent);
        assert!(submission.medications.is_empty());
        assert_eq!(submission.smoker, None);
    }

    #[test]
    fn validate_lists_every_missing_field() {
        let submission = ConsentFormSubmission {
            given_names: "Jane".to_string(),
            surname: "   ".to_string(),
            ..ConsentFormSubmission::default()
        };
        match submission.validate() {
            Err(ValidationError::MissingRequiredFields(fields)) => {
                assert!(fields.contains(&"surname"));
                assert!(fields.contains(&"signatureDate"));
                assert!(!fields.contains(&"givenNames"));
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn attachment_name_replaces_separators() {
        let submission = ConsentFormSubmission {
            given_names: " Mary Anne ".to_string(),
            surname: "O'Neil/Smith".to_string(),
            ..ConsentFormSubmission::default()
        };
        assert_eq!(
            submission.attachment_name(),
            "Consent_Form_Mary_Anne_O'Neil_Smith.pdf"
        );
        assert_eq!(submission.full_name(), "Mary Anne O'Neil/Smith");
    }
}
