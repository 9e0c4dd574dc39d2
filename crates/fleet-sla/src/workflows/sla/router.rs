use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::comparator::{ComparisonError, ComparisonResult};
use super::domain::{Part, ScenarioRequest};
use super::evaluator::ScenarioResult;
use super::report::{ComparisonReportView, CustomerAccountView, ScenarioReportView};
use super::repository::{RepositoryError, WorkbenchRepository};
use super::service::{SlaService, SlaServiceError};
use super::workbench::{WorkbenchError, WorkbenchId};
use crate::workflows::billing::normalize_plate;

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub result: ScenarioResult,
    pub report: ScenarioReportView,
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub comparison: ComparisonResult,
    pub report: ComparisonReportView,
}

impl From<ComparisonResult> for ComparisonResponse {
    fn from(comparison: ComparisonResult) -> Self {
        let report = ComparisonReportView::from_comparison(&comparison);
        Self { comparison, report }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerListResponse {
    pub total: usize,
    pub customers: Vec<CustomerAccountView>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub scenarios: Vec<ScenarioRequest>,
}

#[derive(Debug, Deserialize)]
pub struct RemovePartsRequest {
    pub names: Vec<String>,
}

/// Router builder exposing the SLA calculators and scenario workbenches.
pub fn sla_router<R>(service: Arc<SlaService<R>>) -> Router
where
    R: WorkbenchRepository + 'static,
{
    Router::new()
        .route("/api/v1/sla/evaluate", post(evaluate_handler::<R>))
        .route("/api/v1/sla/compare", post(compare_handler::<R>))
        .route("/api/v1/sla/customers", get(customers_handler::<R>))
        .route("/api/v1/sla/customers/:plate", get(customer_handler::<R>))
        .route("/api/v1/sla/workbenches", post(open_handler::<R>))
        .route(
            "/api/v1/sla/workbenches/:workbench_id",
            get(workbench_handler::<R>),
        )
        .route(
            "/api/v1/sla/workbenches/:workbench_id/parts",
            post(add_part_handler::<R>).delete(remove_parts_handler::<R>),
        )
        .route(
            "/api/v1/sla/workbenches/:workbench_id/scenarios",
            post(record_scenario_handler::<R>),
        )
        .route(
            "/api/v1/sla/workbenches/:workbench_id/compare",
            post(compare_workbench_handler::<R>),
        )
        .route(
            "/api/v1/sla/workbenches/:workbench_id/restart",
            post(restart_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    axum::Json(request): axum::Json<ScenarioRequest>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.evaluate(request) {
        Ok(result) => {
            let report = ScenarioReportView::from_result(1, &result);
            (
                StatusCode::OK,
                axum::Json(EvaluationResponse { result, report }),
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn compare_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    axum::Json(request): axum::Json<CompareRequest>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.compare(request.scenarios) {
        Ok(comparison) => (
            StatusCode::OK,
            axum::Json(ComparisonResponse::from(comparison)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn customers_handler<R>(State(service): State<Arc<SlaService<R>>>) -> Response
where
    R: WorkbenchRepository + 'static,
{
    let customers: Vec<CustomerAccountView> = service
        .customers()
        .iter()
        .map(CustomerAccountView::from_account)
        .collect();
    let response = CustomerListResponse {
        total: customers.len(),
        customers,
    };
    (StatusCode::OK, axum::Json(response)).into_response()
}

pub(crate) async fn customer_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    Path(plate): Path<String>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.lookup_customer(&plate) {
        Some(account) => (StatusCode::OK, axum::Json(account)).into_response(),
        None => {
            let payload = json!({
                "error": format!("plate {} is not in the billing base", normalize_plate(&plate)),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn open_handler<R>(State(service): State<Arc<SlaService<R>>>) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.open_workbench() {
        Ok(workbench) => (StatusCode::CREATED, axum::Json(workbench.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn workbench_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    Path(workbench_id): Path<String>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.workbench(&WorkbenchId(workbench_id)) {
        Ok(workbench) => (StatusCode::OK, axum::Json(workbench.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_part_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    Path(workbench_id): Path<String>,
    axum::Json(part): axum::Json<Part>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.add_part(&WorkbenchId(workbench_id), part) {
        Ok(workbench) => (StatusCode::OK, axum::Json(workbench.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_parts_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    Path(workbench_id): Path<String>,
    axum::Json(request): axum::Json<RemovePartsRequest>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.remove_parts(&WorkbenchId(workbench_id), &request.names) {
        Ok(workbench) => (StatusCode::OK, axum::Json(workbench.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_scenario_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    Path(workbench_id): Path<String>,
    axum::Json(request): axum::Json<ScenarioRequest>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.record_scenario(&WorkbenchId(workbench_id), request) {
        Ok(workbench) => (StatusCode::CREATED, axum::Json(workbench.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn compare_workbench_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    Path(workbench_id): Path<String>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.begin_comparison(&WorkbenchId(workbench_id)) {
        Ok((_, comparison)) => (
            StatusCode::OK,
            axum::Json(ComparisonResponse::from(comparison)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn restart_handler<R>(
    State(service): State<Arc<SlaService<R>>>,
    Path(workbench_id): Path<String>,
) -> Response
where
    R: WorkbenchRepository + 'static,
{
    match service.restart(&WorkbenchId(workbench_id)) {
        Ok(workbench) => (StatusCode::OK, axum::Json(workbench.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_status(error: &SlaServiceError) -> StatusCode {
    match error {
        SlaServiceError::Input(_)
        | SlaServiceError::UnknownPlate(_)
        | SlaServiceError::Comparison(ComparisonError::EmptyScenarioList)
        | SlaServiceError::Workbench(WorkbenchError::InvalidPart(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SlaServiceError::Workbench(_) | SlaServiceError::Repository(RepositoryError::Conflict) => {
            StatusCode::CONFLICT
        }
        SlaServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SlaServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: SlaServiceError) -> Response {
    let status = error_status(&error);
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
