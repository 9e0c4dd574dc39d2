//! SLA evaluation engine and the scenario comparison workbench built on top of it.
//!
//! [`count_business_days`], [`evaluate`] and [`compare`] are pure functions; the
//! workbench, repository, service and router layers hold the per-session state
//! that callers accumulate between comparisons.

pub mod business_days;
pub mod comparator;
pub mod domain;
pub mod evaluator;
pub mod money;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod workbench;

#[cfg(test)]
mod tests;

pub use business_days::count_business_days;
pub use comparator::{compare, ComparisonError, ComparisonResult};
pub use domain::{
    CategoryPolicy, Part, ScenarioInput, ScenarioInputError, ScenarioRequest, ServiceCategory,
    MAX_MONETARY_VALUE,
};
pub use evaluator::{evaluate, EvaluationWarning, ScenarioResult, SlaEvaluator, SlaStatus};
pub use money::{format_brl, parse_brl, round_money, CurrencyParseError};
pub use repository::{RepositoryError, WorkbenchRepository, WorkbenchView};
pub use router::sla_router;
pub use service::{SlaService, SlaServiceError};
pub use workbench::{ScenarioWorkbench, WorkbenchError, WorkbenchId, WorkbenchMode};
