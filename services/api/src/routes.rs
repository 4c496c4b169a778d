use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use clinic_forms::forms::consent::{consent_router, ConsentFormService, DocumentTemplateStore};
use clinic_forms::forms::contact::{contact_router, ContactFormService};
use clinic_forms::forms::mail::EmailDispatcher;
use clinic_forms::forms::ErrorDetail;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_form_routes<T, D>(
    consent: Arc<ConsentFormService<T, D>>,
    contact: Arc<ContactFormService<D>>,
    detail: ErrorDetail,
) -> axum::Router
where
    T: DocumentTemplateStore + 'static,
    D: EmailDispatcher + 'static,
{
    consent_router(consent, detail)
        .merge(contact_router(contact))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
