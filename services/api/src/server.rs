use crate::cli::ServeArgs;
use crate::infra::{form_services, AppState};
use crate::routes::with_form_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use clinic_forms::config::AppConfig;
use clinic_forms::error::AppError;
use clinic_forms::forms::mail::SmtpDispatcher;
use clinic_forms::forms::ErrorDetail;
use clinic_forms::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dispatcher = Arc::new(SmtpDispatcher::from_config(&config.mail)?);
    let (consent_service, contact_service) = form_services(&config, dispatcher.clone());
    let detail = ErrorDetail::from(config.environment);

    let app = with_form_routes(consent_service, contact_service, detail)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        relay = dispatcher.relay(),
        ?detail,
        "clinic form service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
