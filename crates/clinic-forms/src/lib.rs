//! Form processing for the clinic website: the consent form that becomes an
//! emailed PDF and the contact form that becomes an emailed enquiry.

pub mod config;
pub mod error;
pub mod forms;
pub mod telemetry;
