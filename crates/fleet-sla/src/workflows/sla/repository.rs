use serde::Serialize;

use super::comparator::ComparisonResult;
use super::domain::Part;
use super::evaluator::ScenarioResult;
use super::money::round_money;
use super::report::ComparisonReportView;
use super::workbench::{ScenarioWorkbench, WorkbenchId, WorkbenchMode};
use rust_decimal::Decimal;

impl ScenarioWorkbench {
    pub fn view(&self) -> WorkbenchView {
        let comparison = self.comparison();
        WorkbenchView {
            workbench_id: self.id.clone(),
            mode: self.mode(),
            mode_label: self.mode().label(),
            next_scenario_number: self.scenarios().len() + 1,
            can_compare: self.can_compare(),
            pending_parts: self.pending_parts().to_vec(),
            pending_parts_total: round_money(
                self.pending_parts().iter().map(|part| part.value).sum(),
            ),
            scenarios: self.scenarios().to_vec(),
            report: comparison.as_ref().map(ComparisonReportView::from_comparison),
            comparison,
        }
    }
}

/// Storage abstraction so the service can run against any session store.
pub trait WorkbenchRepository: Send + Sync {
    fn insert(&self, workbench: ScenarioWorkbench) -> Result<ScenarioWorkbench, RepositoryError>;
    fn update(&self, workbench: ScenarioWorkbench) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &WorkbenchId) -> Result<Option<ScenarioWorkbench>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("workbench already exists")]
    Conflict,
    #[error("workbench not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Snapshot of a workbench as returned by the HTTP API.
#[derive(Debug, Clone, Serialize)]
pub struct WorkbenchView {
    pub workbench_id: WorkbenchId,
    pub mode: WorkbenchMode,
    pub mode_label: &'static str,
    pub next_scenario_number: usize,
    pub can_compare: bool,
    pub pending_parts: Vec<Part>,
    pub pending_parts_total: Decimal,
    pub scenarios: Vec<ScenarioResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ComparisonReportView>,
}
