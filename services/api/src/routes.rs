use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fleet_sla::workflows::sla::{sla_router, SlaService, WorkbenchRepository};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_sla_routes<R>(service: Arc<SlaService<R>>) -> axum::Router
where
    R: WorkbenchRepository + 'static,
{
    sla_router(service)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryWorkbenchRepository;
    use axum::body::Body;
    use axum::http::Request;
    use fleet_sla::workflows::billing::{CustomerAccount, CustomerBillingBase};
    use fleet_sla::workflows::sla::SlaEvaluator;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use rust_decimal::Decimal;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let billing = CustomerBillingBase::from_accounts(vec![CustomerAccount {
            customer: "Acme".to_string(),
            plate: "ABC1D23".to_string(),
            monthly_fee: Decimal::new(1500, 0),
        }]);
        let service = Arc::new(SlaService::new(
            Arc::new(InMemoryWorkbenchRepository::default()),
            SlaEvaluator::default(),
            Arc::new(billing),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_sla_routes(service).layer(Extension(state))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_the_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_sla_routes_share_the_router() {
        let response = app(true)
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(json_body(response).await["status"], "ok");

        let payload = json!({
            "plate": "abc1d23",
            "entry_date": "2024-01-01",
            "exit_date": "2024-01-08",
            "service_category": "Corretiva – 3 dias úteis",
            "parts": [{ "name": "Filtro", "value": 50 }]
        });
        let response = app(true)
            .oneshot(
                Request::post("/api/v1/sla/evaluate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["result"]["customer"], "Acme");
        assert_eq!(body["report"]["final_total"], "R$1.450,00");
    }

    #[tokio::test]
    async fn metrics_are_exposed_as_text() {
        let response = app(true)
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
