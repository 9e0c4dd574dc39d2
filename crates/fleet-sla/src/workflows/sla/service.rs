use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use super::comparator::{compare, ComparisonError, ComparisonResult};
use super::domain::{Part, ScenarioInputError, ScenarioRequest};
use super::evaluator::{ScenarioResult, SlaEvaluator};
use super::repository::{RepositoryError, WorkbenchRepository};
use super::workbench::{ScenarioWorkbench, WorkbenchError, WorkbenchId};
use crate::workflows::billing::{normalize_plate, CustomerAccount, CustomerBillingBase};

/// Service composing the evaluator, the billing base, and workbench storage.
pub struct SlaService<R> {
    repository: Arc<R>,
    evaluator: SlaEvaluator,
    billing: Arc<CustomerBillingBase>,
    write_lock: Mutex<()>,
}

static WORKBENCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_workbench_id() -> WorkbenchId {
    let id = WORKBENCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    WorkbenchId(format!("wb-{id:06}"))
}

impl<R> SlaService<R>
where
    R: WorkbenchRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        evaluator: SlaEvaluator,
        billing: Arc<CustomerBillingBase>,
    ) -> Self {
        Self {
            repository,
            evaluator,
            billing,
            write_lock: Mutex::new(()),
        }
    }

    pub fn evaluator(&self) -> SlaEvaluator {
        self.evaluator
    }

    pub fn lookup_customer(&self, plate: &str) -> Option<CustomerAccount> {
        self.billing.lookup(plate).cloned()
    }

    /// Every account in the billing base, in file order.
    pub fn customers(&self) -> &[CustomerAccount] {
        self.billing.accounts()
    }

    /// Evaluate one scenario without touching any workbench.
    pub fn evaluate(&self, request: ScenarioRequest) -> Result<ScenarioResult, SlaServiceError> {
        let request = self.resolve_account(request)?;
        let result = self.evaluator.evaluate_request(request)?;

        for warning in &result.warnings {
            warn!(plate = %result.plate, "{}", warning.message());
        }
        debug!(
            plate = %result.plate,
            business_days = result.business_days_used,
            excess_days = result.excess_days,
            final_total = %result.final_total,
            "scenario evaluated"
        );

        Ok(result)
    }

    /// Evaluate a batch of scenarios and pick the cheapest one.
    pub fn compare(
        &self,
        requests: Vec<ScenarioRequest>,
    ) -> Result<ComparisonResult, SlaServiceError> {
        let results = requests
            .into_iter()
            .map(|request| self.evaluate(request))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(compare(&results)?)
    }

    pub fn open_workbench(&self) -> Result<ScenarioWorkbench, SlaServiceError> {
        let workbench = ScenarioWorkbench::new(next_workbench_id());
        let stored = self.repository.insert(workbench)?;
        info!(workbench = %stored.id.0, "workbench opened");
        Ok(stored)
    }

    pub fn workbench(&self, id: &WorkbenchId) -> Result<ScenarioWorkbench, SlaServiceError> {
        let workbench = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(workbench)
    }

    pub fn add_part(
        &self,
        id: &WorkbenchId,
        part: Part,
    ) -> Result<ScenarioWorkbench, SlaServiceError> {
        self.modify(id, |workbench| {
            workbench.add_part(part)?;
            Ok(())
        })
    }

    pub fn remove_parts(
        &self,
        id: &WorkbenchId,
        names: &[String],
    ) -> Result<ScenarioWorkbench, SlaServiceError> {
        self.modify(id, |workbench| {
            workbench.remove_parts(names)?;
            Ok(())
        })
    }

    /// Evaluate a scenario with the staged parts (followed by any in the request) and append it.
    pub fn record_scenario(
        &self,
        id: &WorkbenchId,
        mut request: ScenarioRequest,
    ) -> Result<ScenarioWorkbench, SlaServiceError> {
        self.modify(id, |workbench| {
            workbench.ensure_collecting()?;

            let mut parts = workbench.pending_parts().to_vec();
            parts.append(&mut request.parts);
            request.parts = parts;

            let result = self.evaluate(request)?;
            let number = workbench.record_scenario(result)?;
            info!(workbench = %workbench.id.0, scenario = number, "scenario recorded");
            Ok(())
        })
    }

    pub fn begin_comparison(
        &self,
        id: &WorkbenchId,
    ) -> Result<(ScenarioWorkbench, ComparisonResult), SlaServiceError> {
        let mut comparison = None;
        let workbench = self.modify(id, |workbench| {
            comparison = Some(workbench.begin_comparison()?);
            Ok(())
        })?;

        let comparison = comparison.ok_or(ComparisonError::EmptyScenarioList)?;
        info!(
            workbench = %workbench.id.0,
            best = comparison.best_index + 1,
            total = %comparison.best_scenario.final_total,
            "comparison started"
        );
        Ok((workbench, comparison))
    }

    pub fn restart(&self, id: &WorkbenchId) -> Result<ScenarioWorkbench, SlaServiceError> {
        self.modify(id, |workbench| {
            workbench.restart();
            Ok(())
        })
    }

    /// Serializes read-modify-write cycles so concurrent requests cannot drop updates.
    fn modify<F>(&self, id: &WorkbenchId, change: F) -> Result<ScenarioWorkbench, SlaServiceError>
    where
        F: FnOnce(&mut ScenarioWorkbench) -> Result<(), SlaServiceError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut workbench = self.workbench(id)?;
        change(&mut workbench)?;
        self.repository.update(workbench.clone())?;
        Ok(workbench)
    }

    /// Fill customer and fee from the billing base when the caller left them blank.
    fn resolve_account(
        &self,
        mut request: ScenarioRequest,
    ) -> Result<ScenarioRequest, SlaServiceError> {
        let plate = normalize_plate(&request.plate);
        if plate.is_empty() {
            return Ok(request);
        }

        match self.billing.lookup(&plate) {
            Some(account) => {
                if request.customer.trim().is_empty() {
                    request.customer = account.customer.clone();
                }
                if request.monthly_fee.is_none() {
                    request.monthly_fee = Some(account.monthly_fee);
                }
                Ok(request)
            }
            None if request.monthly_fee.is_none() => {
                Err(SlaServiceError::UnknownPlate(plate))
            }
            None => Ok(request),
        }
    }
}

/// Error raised by the SLA service.
#[derive(Debug, thiserror::Error)]
pub enum SlaServiceError {
    #[error(transparent)]
    Input(#[from] ScenarioInputError),
    #[error("plate {0} is not in the billing base; provide the monthly fee")]
    UnknownPlate(String),
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
    #[error(transparent)]
    Workbench(#[from] WorkbenchError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
