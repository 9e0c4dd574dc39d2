use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::workflows::billing::{CustomerAccount, CustomerBillingBase};
use crate::workflows::sla::domain::{CategoryPolicy, Part, ScenarioRequest, ServiceCategory};
use crate::workflows::sla::evaluator::SlaEvaluator;
use crate::workflows::sla::repository::{RepositoryError, WorkbenchRepository};
use crate::workflows::sla::service::SlaService;
use crate::workflows::sla::workbench::{ScenarioWorkbench, WorkbenchId};

pub(super) fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).expect("valid date")
}

pub(super) fn billing_base() -> CustomerBillingBase {
    CustomerBillingBase::from_accounts(vec![
        CustomerAccount {
            customer: "Acme".to_string(),
            plate: "ABC1D23".to_string(),
            monthly_fee: dec!(1500),
        },
        CustomerAccount {
            customer: "Beta Logística".to_string(),
            plate: "XYZ9K88".to_string(),
            monthly_fee: dec!(3000),
        },
    ])
}

/// Corrective service, 2024-01-01 (Mon) -> `exit_day`, fee resolved from the billing base.
pub(super) fn request(plate: &str, exit_day: u32) -> ScenarioRequest {
    ScenarioRequest {
        customer: String::new(),
        plate: plate.to_string(),
        entry_date: date(1),
        exit_date: date(exit_day),
        holiday_count: 0,
        service_category: ServiceCategory::Corrective,
        parts: Vec::new(),
        monthly_fee: None,
    }
}

pub(super) fn part(name: &str, value: Decimal) -> Part {
    Part::new(name, value)
}

pub(super) fn build_service() -> (SlaService<MemoryRepository>, Arc<MemoryRepository>) {
    build_service_with_policy(CategoryPolicy::Lenient)
}

pub(super) fn build_service_with_policy(
    policy: CategoryPolicy,
) -> (SlaService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = SlaService::new(
        repository.clone(),
        SlaEvaluator::new(policy),
        Arc::new(billing_base()),
    );
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) workbenches: Arc<Mutex<HashMap<WorkbenchId, ScenarioWorkbench>>>,
}

impl WorkbenchRepository for MemoryRepository {
    fn insert(&self, workbench: ScenarioWorkbench) -> Result<ScenarioWorkbench, RepositoryError> {
        let mut guard = self.workbenches.lock().expect("repository mutex poisoned");
        if guard.contains_key(&workbench.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(workbench.id.clone(), workbench.clone());
        Ok(workbench)
    }

    fn update(&self, workbench: ScenarioWorkbench) -> Result<(), RepositoryError> {
        let mut guard = self.workbenches.lock().expect("repository mutex poisoned");
        guard.insert(workbench.id.clone(), workbench);
        Ok(())
    }

    fn fetch(&self, id: &WorkbenchId) -> Result<Option<ScenarioWorkbench>, RepositoryError> {
        let guard = self.workbenches.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl WorkbenchRepository for UnavailableRepository {
    fn insert(&self, _workbench: ScenarioWorkbench) -> Result<ScenarioWorkbench, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn update(&self, _workbench: ScenarioWorkbench) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn fetch(&self, _id: &WorkbenchId) -> Result<Option<ScenarioWorkbench>, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
