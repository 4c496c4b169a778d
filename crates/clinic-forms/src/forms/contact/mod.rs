//! Website contact form: validate and relay the enquiry by email.

pub mod domain;
pub mod router;
pub mod service;


pub use domain::ContactSubmission;
pub use router::{contact_router, ContactResponse, CONTACT_ROUTE, CONTACT_SUCCESS_MESSAGE};
pub use service::{ContactFormError, ContactFormService, ContactRecipients};
