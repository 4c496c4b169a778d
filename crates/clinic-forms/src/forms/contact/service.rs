use std::sync::Arc;

use tracing::info;

use super::domain::ContactSubmission;
use crate::forms::mail::{escape_html, DispatchError, EmailDispatcher, OutboundEmail};
use crate::forms::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecipients {
    pub from: String,
    pub to: String,
}

/// Relays website enquiries to the clinic inbox. Delivery failure fails the request.
pub struct ContactFormService<D> {
    dispatcher: Arc<D>,
    recipients: ContactRecipients,
}

impl<D> ContactFormService<D>
where
    D: EmailDispatcher + 'static,
{
    pub fn new(dispatcher: Arc<D>, recipients: ContactRecipients) -> Self {
        Self {
            dispatcher,
            recipients,
        }
    }

    pub fn submit(&self, submission: ContactSubmission) -> Result<(), ContactFormError> {
        submission.validate()?;
        let email = self.compose_email(&submission);
        self.dispatcher.dispatch(&email)?;
        info!(subject = %submission.subject_input.trim(), "contact enquiry emailed");
        Ok(())
    }

    fn compose_email(&self, submission: &ContactSubmission) -> OutboundEmail {
        let name = submission.full_name();
        let email = submission.email.trim();
        let subject = submission.subject_input.trim();
        let message = submission.message.trim();

        let text = format!(
            "Name: {name}\nEmail: {email}\nSubject: {subject}\n\nMessage:\n{message}\n"
        );
        let html = format!(
            "<h2>New website enquiry</h2>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Subject:</strong> {}</p>\
             <p><strong>Message:</strong></p><p>{}</p>",
            escape_html(&name),
            escape_html(email),
            escape_html(subject),
            escape_html(message)
        );

        OutboundEmail::new(
            &self.recipients.from,
            std::slice::from_ref(&self.recipients.to),
            format!("Website Enquiry: {subject}"),
        )
        .with_reply_to(email)
        .with_body(text, html)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContactFormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to send email: {0}")]
    Dispatch(#[from] DispatchError),
}
