use lettre::message::Mailbox;
use lettre::Address;

/// Rejections raised before any document or email is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Blank and whitespace-only values count as absent.
pub(crate) fn require(missing: &mut Vec<&'static str>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        missing.push(field);
    }
}

/// Accepts a bare address the outbound relay can also place in a header.
pub(crate) fn require_email(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.parse::<Address>().is_ok() && trimmed.parse::<Mailbox>().is_ok() {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(trimmed.to_string()))
    }
}
