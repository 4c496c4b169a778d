use std::sync::Arc;

use tracing::{info, warn};

use super::domain::ConsentFormSubmission;
use super::layout::ConsentLayout;
use super::render::{ConsentPdfRenderer, RenderError, RenderedDocument};
use super::template::{DocumentTemplateStore, TemplateError};
use crate::forms::mail::{
    escape_html, DispatchError, EmailAttachment, EmailDispatcher, OutboundEmail,
};
use crate::forms::validation::ValidationError;

/// Sender and destinations for filled consent forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentRecipients {
    pub from: String,
    pub to: Vec<String>,
    pub bcc: Vec<String>,
}

/// Whether the filled form reached the mail relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct ConsentSubmissionOutcome {
    pub document: RenderedDocument,
    pub delivery: DeliveryStatus,
}

/// Validate, fill the template, then attempt delivery.
///
/// Delivery is best effort: once the document exists, a relay failure is
/// reported in the outcome instead of failing the submission.
pub struct ConsentFormService<T, D> {
    templates: Arc<T>,
    dispatcher: Arc<D>,
    renderer: ConsentPdfRenderer,
    recipients: ConsentRecipients,
}

impl<T, D> ConsentFormService<T, D>
where
    T: DocumentTemplateStore + 'static,
    D: EmailDispatcher + 'static,
{
    pub fn new(
        templates: Arc<T>,
        dispatcher: Arc<D>,
        layout: ConsentLayout,
        recipients: ConsentRecipients,
    ) -> Self {
        Self {
            templates,
            dispatcher,
            renderer: ConsentPdfRenderer::new(layout),
            recipients,
        }
    }

    /// Produce the filled PDF without sending anything.
    pub fn render(
        &self,
        submission: &ConsentFormSubmission,
    ) -> Result<RenderedDocument, ConsentFormError> {
        submission.validate()?;
        let template = self.templates.load()?;
        let document = self.renderer.render(&template, submission)?;
        Ok(document)
    }

    pub fn submit(
        &self,
        submission: ConsentFormSubmission,
    ) -> Result<ConsentSubmissionOutcome, ConsentFormError> {
        let document = self.render(&submission)?;
        let email = self.compose_email(&submission, &document);

        let delivery = match self.dispatcher.dispatch(&email) {
            Ok(()) => {
                info!(
                    attachment = %document.filename,
                    pages = document.page_count,
                    "consent form generated and emailed"
                );
                DeliveryStatus::Sent
            }
            Err(err) => {
                warn!(
                    attachment = %document.filename,
                    error = %err,
                    "consent form generated but email dispatch failed"
                );
                DeliveryStatus::from(err)
            }
        };

        Ok(ConsentSubmissionOutcome { document, delivery })
    }

    fn compose_email(
        &self,
        submission: &ConsentFormSubmission,
        document: &RenderedDocument,
    ) -> OutboundEmail {
        let name = submission.full_name();
        let email = submission.email.trim();

        let text = format!(
            "A new patient consent form has been submitted by {name} ({email}).\n\
             The completed form is attached as {}.",
            document.filename
        );
        let html = format!(
            "<p>A new patient consent form has been submitted by <strong>{}</strong> ({}).</p>\
             <p>The completed form is attached as {}.</p>",
            escape_html(&name),
            escape_html(email),
            escape_html(&document.filename)
        );

        OutboundEmail::new(
            &self.recipients.from,
            &self.recipients.to,
            format!("New Patient Consent Form - {name}"),
        )
        .with_bcc(&self.recipients.bcc)
        .with_body(text, html)
        .with_attachment(EmailAttachment {
            filename: document.filename.clone(),
            content_type: "application/pdf".to_string(),
            content: document.bytes.clone(),
        })
    }
}

/// Failures that happen before a document exists.
#[derive(Debug, thiserror::Error)]
pub enum ConsentFormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("consent form template unavailable")]
    Template(#[from] TemplateError),
    #[error("unable to generate consent form PDF")]
    Render(#[from] RenderError),
}

impl From<DispatchError> for DeliveryStatus {
    fn from(err: DispatchError) -> Self {
        DeliveryStatus::Failed {
            reason: err.to_string(),
        }
    }
}
