//! The two website form endpoints and the collaborators they share.

pub mod consent;
pub mod contact;
pub mod http;
pub mod mail;
pub mod validation;

pub use http::ErrorDetail;
pub use validation::ValidationError;

#[cfg(test)]
pub(crate) mod test_support;
