use crate::cli::ServeArgs;
use crate::infra::{load_billing_base, AppState, InMemoryWorkbenchRepository};
use crate::routes::with_sla_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fleet_sla::config::AppConfig;
use fleet_sla::error::AppError;
use fleet_sla::telemetry;
use fleet_sla::workflows::sla::{SlaEvaluator, SlaService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let billing = load_billing_base(config.sla.billing_csv.clone())?;
    if billing.is_empty() {
        warn!("no billing base configured; requests must carry the monthly fee");
    }

    let sla_service = Arc::new(SlaService::new(
        Arc::new(InMemoryWorkbenchRepository::default()),
        SlaEvaluator::new(config.sla.unknown_category),
        Arc::new(billing),
    ));

    let app = with_sla_routes(sla_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = ?config.sla.unknown_category,
        "fleet sla service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
