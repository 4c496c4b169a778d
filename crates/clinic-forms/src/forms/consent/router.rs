use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::domain::ConsentFormSubmission;
use super::service::{ConsentFormError, ConsentFormService, DeliveryStatus};
use super::template::DocumentTemplateStore;
use crate::forms::http::{
    error_response, error_stack, method_not_allowed, rejection_response, ErrorDetail,
};
use crate::forms::mail::EmailDispatcher;

pub const CONSENT_ROUTE: &str = "/api/generateConsentPdf";

/// Router state: the service plus how much error detail to expose.
pub struct ConsentRouteState<T, D> {
    service: Arc<ConsentFormService<T, D>>,
    detail: ErrorDetail,
}

impl<T, D> Clone for ConsentRouteState<T, D> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            detail: self.detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<DeliveryStatus> for ConsentResponse {
    fn from(delivery: DeliveryStatus) -> Self {
        match delivery {
            DeliveryStatus::Sent => Self {
                success: true,
                email_success: None,
                message: None,
            },
            DeliveryStatus::Failed { reason } => Self {
                success: true,
                email_success: Some(false),
                message: Some(format!(
                    "Consent form generated but the email could not be sent: {reason}"
                )),
            },
        }
    }
}

/// Router builder exposing the consent form endpoint.
pub fn consent_router<T, D>(service: Arc<ConsentFormService<T, D>>, detail: ErrorDetail) -> Router
where
    T: DocumentTemplateStore + 'static,
    D: EmailDispatcher + 'static,
{
    Router::new()
        .route(
            CONSENT_ROUTE,
            post(submit_handler::<T, D>).fallback(method_not_allowed),
        )
        .with_state(ConsentRouteState { service, detail })
}

pub(crate) async fn submit_handler<T, D>(
    State(state): State<ConsentRouteState<T, D>>,
    payload: Result<Json<ConsentFormSubmission>, JsonRejection>,
) -> Response
where
    T: DocumentTemplateStore + 'static,
    D: EmailDispatcher + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    let service = Arc::clone(&state.service);
    let result = tokio::task::spawn_blocking(move || service.submit(submission)).await;

    match result {
        Ok(Ok(outcome)) => {
            (StatusCode::OK, Json(ConsentResponse::from(outcome.delivery))).into_response()
        }
        Ok(Err(ConsentFormError::Validation(err))) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Ok(Err(err)) => {
            error!(error = %err, "consent form generation failed");
            generation_failure(&err, state.detail)
        }
        Err(err) => {
            error!(error = %err, "consent form worker did not complete");
            generation_failure(&err, state.detail)
        }
    }
}

fn generation_failure(err: &(dyn std::error::Error + 'static), detail: ErrorDetail) -> Response {
    let mut body = json!({
        "error": "Failed to generate consent form",
        "message": err.to_string(),
    });
    if detail.is_verbose() {
        body["stack"] = json!(error_stack(err));
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
