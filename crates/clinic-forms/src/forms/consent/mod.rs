//! New-patient consent form: validate, fill the PDF template, email it.

pub mod domain;
pub mod layout;
pub mod render;
pub mod router;
pub mod service;
pub mod template;

#[cfg(test)]
mod tests;

pub use domain::{ConsentFormSubmission, Medication};
pub use layout::{ConsentField, ConsentLayout, FieldPlacement, MedicationTable};
pub use render::{ConsentPdfRenderer, RenderError, RenderedDocument};
pub use router::{consent_router, ConsentResponse, CONSENT_ROUTE};
pub use service::{
    ConsentFormError, ConsentFormService, ConsentRecipients, ConsentSubmissionOutcome,
    DeliveryStatus,
};
pub use template::{DocumentTemplateStore, FsTemplateStore, TemplateError};
