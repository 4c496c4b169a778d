//! Response helpers shared by the form routers.

use axum::extract::rejection::JsonRejection;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::AppEnvironment;

/// Whether error bodies carry the error source chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDetail {
    #[default]
    Verbose,
    Redacted,
}

impl ErrorDetail {
    pub fn is_verbose(self) -> bool {
        matches!(self, ErrorDetail::Verbose)
    }
}

impl From<AppEnvironment> for ErrorDetail {
    fn from(environment: AppEnvironment) -> Self {
        if environment.exposes_error_details() {
            ErrorDetail::Verbose
        } else {
            ErrorDetail::Redacted
        }
    }
}

/// The error followed by each of its sources, outermost first.
pub fn error_stack(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut stack = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        stack.push(cause.to_string());
        source = cause.source();
    }
    stack
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    (status, Json(json!({ "error": message }))).into_response()
}

/// Bodies that are not JSON get 415; malformed JSON gets 400.
pub(crate) fn rejection_response(rejection: JsonRejection) -> Response {
    let status = match rejection {
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(status, rejection.body_text())
}

pub(crate) async fn method_not_allowed(method: Method) -> Response {
    let mut response = error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("method {method} not allowed"),
    );
    response
        .headers_mut()
        .insert(header::ALLOW, header::HeaderValue::from_static("POST"));
    response
}
