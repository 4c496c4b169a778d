use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use super::domain::ContactSubmission;
use super::service::{ContactFormError, ContactFormService};
use crate::forms::http::{error_response, method_not_allowed, rejection_response};
use crate::forms::mail::EmailDispatcher;

pub const CONTACT_ROUTE: &str = "/api/sendContactEmail";
pub const CONTACT_SUCCESS_MESSAGE: &str = "Contact form submitted successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_success: Option<bool>,
    pub message: String,
}

/// Router builder exposing the contact form endpoint.
pub fn contact_router<D>(service: Arc<ContactFormService<D>>) -> Router
where
    D: EmailDispatcher + 'static,
{
    Router::new()
        .route(
            CONTACT_ROUTE,
            post(submit_handler::<D>).fallback(method_not_allowed),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<D>(
    State(service): State<Arc<ContactFormService<D>>>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Response
where
    D: EmailDispatcher + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    let result = tokio::task::spawn_blocking(move || service.submit(submission)).await;

    match result {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(ContactResponse {
                success: true,
                email_success: None,
                message: CONTACT_SUCCESS_MESSAGE.to_string(),
            }),
        )
            .into_response(),
        Ok(Err(ContactFormError::Validation(err))) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Ok(Err(err)) => {
            error!(error = %err, "contact enquiry could not be emailed");
            delivery_failure(err.to_string())
        }
        Err(err) => {
            error!(error = %err, "contact form worker did not complete");
            delivery_failure(err.to_string())
        }
    }
}

fn delivery_failure(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ContactResponse {
            success: false,
            email_success: Some(false),
            message,
        }),
    )
        .into_response()
}
