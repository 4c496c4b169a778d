use serde::{Deserialize, Serialize};

use crate::forms::validation::{require, require_email, ValidationError};

/// Payload posted by the website contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(alias = "subject")]
    pub subject_input: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        require(&mut missing, "firstName", &self.first_name);
        require(&mut missing, "lastName", &self.last_name);
        require(&mut missing, "email", &self.email);
        require(&mut missing, "subjectInput", &self.subject_input);
        require(&mut missing, "message", &self.message);

        if !missing.is_empty() {
            return Err(ValidationError::MissingRequiredFields(missing));
        }

        require_email(&self.email)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_alias_is_accepted() {
        let submission: ContactSubmission = serde_json::from_str(
            r#"{"firstName":"A","lastName":"B","email":"a@b.com","subject":"Hi","message":"Test"}"#,
        )
        .expect("payload deserializes");
        assert_eq!(submission.subject_input, "Hi");
        assert!(submission.validate().is_ok());
    }

    #[test]
    fn blank_message_is_missing() {
        let submission = ContactSubmission {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@b.com".to_string(),
            subject_input: "Hi".to_string(),
            message: "\n  ".to_string(),
        };
        assert_eq!(
            submission.validate(),
            Err(ValidationError::MissingRequiredFields(vec!["message"]))
        );
    }
}
