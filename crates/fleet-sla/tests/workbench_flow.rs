use chrono::NaiveDate;
use fleet_sla::workflows::billing::CustomerBillingBase;
use fleet_sla::workflows::sla::report::ComparisonReportView;
use fleet_sla::workflows::sla::{
    Part, RepositoryError, ScenarioRequest, ScenarioWorkbench, ServiceCategory, SlaEvaluator,
    SlaService, SlaServiceError, WorkbenchId, WorkbenchMode, WorkbenchRepository,
};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct SessionStore {
    sessions: Mutex<HashMap<WorkbenchId, ScenarioWorkbench>>,
}

impl WorkbenchRepository for SessionStore {
    fn insert(&self, workbench: ScenarioWorkbench) -> Result<ScenarioWorkbench, RepositoryError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        if guard.contains_key(&workbench.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(workbench.id.clone(), workbench.clone());
        Ok(workbench)
    }

    fn update(&self, workbench: ScenarioWorkbench) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        match guard.get_mut(&workbench.id) {
            Some(slot) => {
                *slot = workbench;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &WorkbenchId) -> Result<Option<ScenarioWorkbench>, RepositoryError> {
        let guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

fn service() -> SlaService<SessionStore> {
    let csv = "CLIENTE,PLACA,VALOR MENSALIDADE\nAcme,ABC1D23,\"R$1.500,00\"\n";
    let billing = CustomerBillingBase::from_reader(csv.as_bytes()).expect("billing imports");
    SlaService::new(
        Arc::new(SessionStore::default()),
        SlaEvaluator::default(),
        Arc::new(billing),
    )
}

fn request(category: ServiceCategory, exit_day: u32) -> ScenarioRequest {
    ScenarioRequest {
        customer: String::new(),
        plate: "ABC1D23".to_string(),
        entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid"),
        exit_date: NaiveDate::from_ymd_opt(2024, 1, exit_day).expect("valid"),
        holiday_count: 0,
        service_category: category,
        parts: Vec::new(),
        monthly_fee: None,
    }
}

#[test]
fn sessions_are_isolated_from_each_other() {
    let service = service();
    let first = service.open_workbench().expect("first session");
    let second = service.open_workbench().expect("second session");
    assert_ne!(first.id, second.id);

    service
        .record_scenario(&first.id, request(ServiceCategory::Corrective, 8))
        .expect("recorded");

    assert_eq!(service.workbench(&first.id).expect("first").scenarios().len(), 1);
    assert!(service
        .workbench(&second.id)
        .expect("second")
        .scenarios()
        .is_empty());
}

#[test]
fn full_comparison_session() {
    let service = service();
    let bench = service.open_workbench().expect("session opens");

    service
        .add_part(&bench.id, Part::new("Filtro", dec!(50.00)))
        .expect("part staged");
    service
        .record_scenario(&bench.id, request(ServiceCategory::Corrective, 8))
        .expect("scenario 1");

    service
        .add_part(&bench.id, Part::new("Bomba", dec!(400)))
        .expect("part staged");
    service
        .add_part(&bench.id, Part::new("Junta", dec!(35)))
        .expect("part staged");
    service
        .remove_parts(&bench.id, &["Bomba".to_string()])
        .expect("part removed");
    let view = service.workbench(&bench.id).expect("session").view();
    assert_eq!(view.pending_parts_total, dec!(35.00));
    assert_eq!(view.next_scenario_number, 2);

    service
        .record_scenario(&bench.id, request(ServiceCategory::Engine, 19))
        .expect("scenario 2");

    let (locked, comparison) = service.begin_comparison(&bench.id).expect("compare");
    assert_eq!(locked.mode(), WorkbenchMode::Comparing);
    assert_eq!(comparison.best_index, 0);
    assert_eq!(comparison.best_scenario.final_total, dec!(1450.00));
    assert_eq!(comparison.scenarios[1].final_total, dec!(1535.00));

    let report = ComparisonReportView::from_comparison(&comparison);
    assert_eq!(report.best.scenario_number, 1);
    assert_eq!(report.best.final_total, "R$1.450,00");
    assert_eq!(report.scenarios[1].service, "Motor – 15 dias úteis");

    assert!(matches!(
        service.add_part(&bench.id, Part::new("Filtro", dec!(1))),
        Err(SlaServiceError::Workbench(_))
    ));

    let fresh = service.restart(&bench.id).expect("restart");
    assert_eq!(fresh.view().next_scenario_number, 1);
    assert!(!fresh.view().can_compare);
}
