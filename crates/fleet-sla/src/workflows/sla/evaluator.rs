use super::business_days::count_business_days;
use super::domain::{
    CategoryPolicy, Part, ScenarioInput, ScenarioInputError, ScenarioRequest, ServiceCategory,
};
use super::money::round_money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Days in the pro-ration month, independent of the calendar month.
pub const PRORATION_BASIS_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    WithinSla,
    Breached,
}

impl SlaStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WithinSla => "Dentro do prazo",
            Self::Breached => "Fora do prazo",
        }
    }
}

/// Non-fatal findings attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationWarning {
    /// The category is outside the catalog, so every business day counted as excess.
    UnknownServiceCategory { label: String },
}

impl EvaluationWarning {
    pub fn message(&self) -> String {
        match self {
            Self::UnknownServiceCategory { label } => {
                format!("service category '{label}' is not in the SLA catalog; threshold set to 0")
            }
        }
    }
}

/// Outcome of evaluating one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub customer: String,
    pub plate: String,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub service_category: ServiceCategory,
    pub holiday_count: u32,
    pub business_days_used: u32,
    pub sla_threshold_days: u32,
    pub excess_days: u32,
    pub status: SlaStatus,
    pub monthly_fee: Decimal,
    pub discount: Decimal,
    pub parts_total: Decimal,
    pub final_total: Decimal,
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<EvaluationWarning>,
}

/// Applies the SLA table and discount formula to a validated scenario.
pub fn evaluate(input: &ScenarioInput) -> ScenarioResult {
    let category = input.service_category();
    let sla_threshold_days = category.threshold_days();
    let business_days_used =
        count_business_days(input.entry_date(), input.exit_date(), input.holiday_count());
    let excess_days = business_days_used.saturating_sub(sla_threshold_days);

    let monthly_fee = input.monthly_fee();
    let discount = prorated_discount(monthly_fee, excess_days);
    let parts_total = round_money(input.parts().iter().map(|part| part.value).sum());
    let final_total = (monthly_fee - discount) + parts_total;

    let status = if excess_days > 0 {
        SlaStatus::Breached
    } else {
        SlaStatus::WithinSla
    };

    let warnings = if category.is_recognized() {
        Vec::new()
    } else {
        vec![EvaluationWarning::UnknownServiceCategory {
            label: category.label().to_string(),
        }]
    };

    ScenarioResult {
        customer: input.customer().to_string(),
        plate: input.plate().to_string(),
        entry_date: input.entry_date(),
        exit_date: input.exit_date(),
        service_category: category.clone(),
        holiday_count: input.holiday_count(),
        business_days_used,
        sla_threshold_days,
        excess_days,
        status,
        monthly_fee,
        discount,
        parts_total,
        final_total,
        parts: input.parts().to_vec(),
        warnings,
    }
}

/// `monthly_fee / 30 * excess_days`, rounded to cents. Zero when nothing exceeded.
pub fn prorated_discount(monthly_fee: Decimal, excess_days: u32) -> Decimal {
    if excess_days == 0 {
        return Decimal::ZERO;
    }

    round_money(monthly_fee * Decimal::from(excess_days) / Decimal::from(PRORATION_BASIS_DAYS))
}

/// Stateless evaluator carrying the unknown-category policy used for validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlaEvaluator {
    policy: CategoryPolicy,
}

impl SlaEvaluator {
    pub fn new(policy: CategoryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CategoryPolicy {
        self.policy
    }

    pub fn evaluate(&self, input: &ScenarioInput) -> ScenarioResult {
        evaluate(input)
    }

    pub fn evaluate_request(
        &self,
        request: ScenarioRequest,
    ) -> Result<ScenarioResult, ScenarioInputError> {
        let input = ScenarioInput::validate(request, self.policy)?;
        Ok(self.evaluate(&input))
    }
}
