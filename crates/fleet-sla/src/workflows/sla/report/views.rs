use super::super::comparator::ComparisonResult;
use super::super::evaluator::{ScenarioResult, SlaStatus};
use super::super::money::format_brl;
use crate::workflows::billing::CustomerAccount;
use chrono::NaiveDate;
use serde::Serialize;

const REPORT_DATE_FORMAT: &str = "%d/%m/%Y";

fn report_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartView {
    pub name: String,
    pub value: String,
}

/// Display-ready copy of a [`ScenarioResult`], one per report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReportView {
    pub scenario_number: usize,
    pub customer: String,
    pub plate: String,
    pub entry_date: String,
    pub exit_date: String,
    pub service: String,
    pub holiday_count: u32,
    pub business_days_used: u32,
    pub sla_threshold_days: u32,
    pub excess_days: u32,
    pub status: SlaStatus,
    pub status_label: &'static str,
    pub monthly_fee: String,
    pub discount: String,
    pub parts_total: String,
    pub final_total: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<PartView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ScenarioReportView {
    pub fn from_result(scenario_number: usize, result: &ScenarioResult) -> Self {
        Self {
            scenario_number,
            customer: result.customer.clone(),
            plate: result.plate.clone(),
            entry_date: report_date(result.entry_date),
            exit_date: report_date(result.exit_date),
            service: result.service_category.display_label(),
            holiday_count: result.holiday_count,
            business_days_used: result.business_days_used,
            sla_threshold_days: result.sla_threshold_days,
            excess_days: result.excess_days,
            status: result.status,
            status_label: result.status.label(),
            monthly_fee: format_brl(result.monthly_fee),
            discount: format_brl(result.discount),
            parts_total: format_brl(result.parts_total),
            final_total: format_brl(result.final_total),
            parts: result
                .parts
                .iter()
                .map(|part| PartView {
                    name: part.name.clone(),
                    value: format_brl(part.value),
                })
                .collect(),
            warnings: result
                .warnings
                .iter()
                .map(|warning| warning.message())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestScenarioView {
    pub scenario_number: usize,
    pub service: String,
    pub plate: String,
    pub final_total: String,
}

/// Every scenario plus the lowest-cost pick, ready for a comparison report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReportView {
    pub scenarios: Vec<ScenarioReportView>,
    pub best: BestScenarioView,
}

impl ComparisonReportView {
    pub fn from_comparison(comparison: &ComparisonResult) -> Self {
        let scenarios = comparison
            .scenarios
            .iter()
            .enumerate()
            .map(|(index, result)| ScenarioReportView::from_result(index + 1, result))
            .collect();

        let best = &comparison.best_scenario;
        Self {
            scenarios,
            best: BestScenarioView {
                scenario_number: comparison.best_index + 1,
                service: best.service_category.display_label(),
                plate: best.plate.clone(),
                final_total: format_brl(best.final_total),
            },
        }
    }
}

/// Row of the customer and plate listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerAccountView {
    pub customer: String,
    pub plate: String,
    pub monthly_fee: String,
}

impl CustomerAccountView {
    pub fn from_account(account: &CustomerAccount) -> Self {
        Self {
            customer: account.customer.clone(),
            plate: account.plate.clone(),
            monthly_fee: format_brl(account.monthly_fee),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::sla::comparator::compare;
    use crate::workflows::sla::domain::{Part, ScenarioRequest, ServiceCategory};
    use crate::workflows::sla::evaluator::SlaEvaluator;
    use rust_decimal_macros::dec;

    fn acme_scenario() -> ScenarioResult {
        SlaEvaluator::default()
            .evaluate_request(ScenarioRequest {
                customer: "Acme".to_string(),
                plate: "ABC1D23".to_string(),
                entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid"),
                exit_date: NaiveDate::from_ymd_opt(2024, 1, 8).expect("valid"),
                holiday_count: 0,
                service_category: ServiceCategory::Corrective,
                parts: vec![Part::new("Filtro", dec!(50))],
                monthly_fee: Some(dec!(1500)),
            })
            .expect("valid scenario")
    }

    #[test]
    fn scenario_view_formats_dates_and_money() {
        let view = ScenarioReportView::from_result(1, &acme_scenario());

        assert_eq!(view.entry_date, "01/01/2024");
        assert_eq!(view.exit_date, "08/01/2024");
        assert_eq!(view.service, "Corretiva – 3 dias úteis");
        assert_eq!(view.status_label, "Fora do prazo");
        assert_eq!(view.discount, "R$100,00");
        assert_eq!(view.final_total, "R$1.450,00");
        assert_eq!(
            view.parts,
            vec![PartView {
                name: "Filtro".to_string(),
                value: "R$50,00".to_string()
            }]
        );
    }

    #[test]
    fn comparison_view_numbers_scenarios_from_one() {
        let mut cheaper = acme_scenario();
        cheaper.plate = "XYZ9K88".to_string();
        cheaper.final_total = dec!(900);
        let comparison = compare(&[acme_scenario(), cheaper]).expect("comparison");

        let view = ComparisonReportView::from_comparison(&comparison);
        assert_eq!(view.scenarios.len(), 2);
        assert_eq!(view.scenarios[1].scenario_number, 2);
        assert_eq!(view.best.scenario_number, 2);
        assert_eq!(view.best.plate, "XYZ9K88");
        assert_eq!(view.best.final_total, "R$900,00");
    }

    #[test]
    fn customer_view_formats_the_fee() {
        let view = CustomerAccountView::from_account(&CustomerAccount {
            customer: "Acme".to_string(),
            plate: "ABC1D23".to_string(),
            monthly_fee: dec!(2250.5),
        });
        assert_eq!(view.monthly_fee, "R$2.250,50");
        assert_eq!(view.plate, "ABC1D23");
    }
}
