use chrono::NaiveDate;
use fleet_sla::config::AppConfig;
use fleet_sla::error::AppError;
use fleet_sla::telemetry::{self, TelemetryError};
use fleet_sla::workflows::billing::CustomerBillingBase;
use fleet_sla::workflows::sla::domain::parse_calendar_date;
use fleet_sla::workflows::sla::{
    parse_brl, Part, RepositoryError, ScenarioWorkbench, WorkbenchId, WorkbenchRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Workbench sessions kept for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryWorkbenchRepository {
    workbenches: Arc<Mutex<HashMap<WorkbenchId, ScenarioWorkbench>>>,
}

impl WorkbenchRepository for InMemoryWorkbenchRepository {
    fn insert(&self, workbench: ScenarioWorkbench) -> Result<ScenarioWorkbench, RepositoryError> {
        let mut guard = self
            .workbenches
            .lock()
            .map_err(|_| RepositoryError::Unavailable("workbench store poisoned".to_string()))?;
        if guard.contains_key(&workbench.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(workbench.id.clone(), workbench.clone());
        Ok(workbench)
    }

    fn update(&self, workbench: ScenarioWorkbench) -> Result<(), RepositoryError> {
        let mut guard = self
            .workbenches
            .lock()
            .map_err(|_| RepositoryError::Unavailable("workbench store poisoned".to_string()))?;
        if guard.contains_key(&workbench.id) {
            guard.insert(workbench.id.clone(), workbench);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &WorkbenchId) -> Result<Option<ScenarioWorkbench>, RepositoryError> {
        let guard = self
            .workbenches
            .lock()
            .map_err(|_| RepositoryError::Unavailable("workbench store poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(raw).ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD"))
}

pub(crate) fn parse_money(raw: &str) -> Result<Decimal, String> {
    parse_brl(raw).map_err(|err| format!("failed to parse '{raw}' as an amount ({err})"))
}

/// Parses `NAME=VALUE`, e.g. `Filtro=50,00`.
pub(crate) fn parse_part(raw: &str) -> Result<Part, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("part name is missing in '{raw}'"));
    }
    Ok(Part::new(name, parse_money(value)?))
}

/// Loads configuration and installs logging for one-shot CLI commands.
///
/// A subscriber that is already installed is kept.
pub(crate) fn cli_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    match telemetry::init(&config.telemetry) {
        Ok(()) | Err(TelemetryError::Subscriber(_)) => Ok(config),
        Err(err) => Err(err.into()),
    }
}

/// Loads the billing spreadsheet when a path is configured; otherwise every fee must be typed in.
pub(crate) fn load_billing_base(path: Option<PathBuf>) -> Result<CustomerBillingBase, AppError> {
    match path {
        Some(path) => {
            let base = CustomerBillingBase::from_path(&path)?;
            info!(path = %path.display(), accounts = base.len(), "billing base loaded");
            Ok(base)
        }
        None => Ok(CustomerBillingBase::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_part_accepts_brazilian_amounts() {
        let part = parse_part("Filtro de óleo=R$ 1.050,50").expect("part parses");
        assert_eq!(part.name, "Filtro de óleo");
        assert_eq!(part.value, Decimal::new(105050, 2));
    }

    #[test]
    fn parse_part_requires_a_name() {
        assert!(parse_part("=10").is_err());
        assert!(parse_part("Filtro").is_err());
        assert!(parse_part("Filtro=abc").is_err());
    }

    #[test]
    fn parse_date_accepts_timestamps() {
        assert_eq!(
            parse_date("2024-01-08T17:30:00Z"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 8).expect("valid"))
        );
        assert!(parse_date("08/01/2024").is_err());
    }

    #[test]
    fn missing_billing_path_yields_empty_base() {
        let base = load_billing_base(None).expect("empty base");
        assert!(base.is_empty());
    }

    #[test]
    fn cli_config_installs_logging_once() {
        let first = cli_config().expect("first command initialises telemetry");
        let second = cli_config().expect("later commands reuse the subscriber");
        assert_eq!(first.telemetry.log_level, second.telemetry.log_level);
        assert!(tracing::dispatcher::has_been_set());
    }
}
