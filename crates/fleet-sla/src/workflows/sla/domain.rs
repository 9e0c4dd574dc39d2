use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::workflows::billing::normalize_plate;

/// Largest fee or part value accepted: R$ 1,000,000,000,000.
///
/// Keeps `fee * excess_days` and the parts sum far inside `Decimal`'s range for
/// any date span chrono can represent.
pub const MAX_MONETARY_VALUE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

fn is_supported_amount(value: Decimal) -> bool {
    (!value.is_sign_negative() || value.is_zero()) && value <= MAX_MONETARY_VALUE
}

/// Maintenance service types covered by the fleet contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceCategory {
    Preventive,
    Corrective,
    PreventiveAndCorrective,
    Engine,
    /// Label outside the contract catalog. Carries a zero-day threshold.
    Unrecognized(String),
}

impl ServiceCategory {
    pub const fn catalog() -> [Self; 4] {
        [
            Self::Preventive,
            Self::Corrective,
            Self::PreventiveAndCorrective,
            Self::Engine,
        ]
    }

    /// Contractual limit in business days before a discount applies.
    pub const fn threshold_days(&self) -> u32 {
        match self {
            Self::Preventive => 2,
            Self::Corrective => 3,
            Self::PreventiveAndCorrective => 5,
            Self::Engine => 15,
            Self::Unrecognized(_) => 0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Preventive => "Preventiva",
            Self::Corrective => "Corretiva",
            Self::PreventiveAndCorrective => "Preventiva + Corretiva",
            Self::Engine => "Motor",
            Self::Unrecognized(label) => label,
        }
    }

    /// Label as shown on the service selection forms, e.g. `Motor – 15 dias úteis`.
    pub fn display_label(&self) -> String {
        match self {
            Self::Unrecognized(label) => label.clone(),
            known => format!("{} – {} dias úteis", known.label(), known.threshold_days()),
        }
    }

    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Accepts the short label or the display label, ignoring case and spacing.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let head = trimmed
            .split(['–', '—'])
            .next()
            .unwrap_or(trimmed)
            .split(" - ")
            .next()
            .unwrap_or(trimmed);
        let key = head
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match key.as_str() {
            "preventiva" => Self::Preventive,
            "corretiva" => Self::Corrective,
            "preventiva + corretiva" | "preventiva+corretiva" => Self::PreventiveAndCorrective,
            "motor" => Self::Engine,
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }
}

impl From<String> for ServiceCategory {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ServiceCategory> for String {
    fn from(value: ServiceCategory) -> Self {
        value.display_label()
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_label())
    }
}

/// How evaluation treats a service category outside the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// Evaluate with a zero-day threshold and attach a warning to the result.
    #[default]
    Lenient,
    /// Reject the scenario.
    Strict,
}

impl FromStr for CategoryPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" | "warn" => Ok(Self::Lenient),
            "strict" | "reject" => Ok(Self::Strict),
            other => Err(other.to_string()),
        }
    }
}

/// Extra cost line attached to a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub value: Decimal,
}

impl Part {
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Unvalidated scenario as received from a form, CLI flags, or JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub plate: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub entry_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub exit_date: NaiveDate,
    #[serde(default)]
    pub holiday_count: i64,
    pub service_category: ServiceCategory,
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Left empty when the fee should come from the customer billing base.
    #[serde(default)]
    pub monthly_fee: Option<Decimal>,
}

/// Scenario whose dates, counts, and amounts have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioInput {
    customer: String,
    plate: String,
    entry_date: NaiveDate,
    exit_date: NaiveDate,
    holiday_count: u32,
    service_category: ServiceCategory,
    parts: Vec<Part>,
    monthly_fee: Decimal,
}

impl ScenarioInput {
    pub fn validate(
        request: ScenarioRequest,
        policy: CategoryPolicy,
    ) -> Result<Self, ScenarioInputError> {
        let ScenarioRequest {
            customer,
            plate,
            entry_date,
            exit_date,
            holiday_count,
            service_category,
            parts,
            monthly_fee,
        } = request;

        let customer = customer.trim().to_string();
        let plate = normalize_plate(&plate);
        if customer.is_empty() && plate.is_empty() {
            return Err(ScenarioInputError::MissingIdentification);
        }

        if exit_date <= entry_date {
            return Err(ScenarioInputError::InvalidDateRange {
                entry: entry_date,
                exit: exit_date,
            });
        }

        let holiday_count = u32::try_from(holiday_count)
            .map_err(|_| ScenarioInputError::InvalidHolidayCount(holiday_count))?;

        let monthly_fee = monthly_fee.ok_or(ScenarioInputError::MissingMonthlyFee)?;
        if !is_supported_amount(monthly_fee) {
            return Err(ScenarioInputError::InvalidMonetaryValue {
                field: "monthly_fee".to_string(),
                value: monthly_fee,
            });
        }

        if let Some(part) = parts.iter().find(|part| !is_supported_amount(part.value)) {
            return Err(ScenarioInputError::InvalidMonetaryValue {
                field: format!("part '{}'", part.name),
                value: part.value,
            });
        }

        if policy == CategoryPolicy::Strict && !service_category.is_recognized() {
            return Err(ScenarioInputError::UnknownServiceCategory(
                service_category.label().to_string(),
            ));
        }

        Ok(Self {
            customer,
            plate,
            entry_date,
            exit_date,
            holiday_count,
            service_category,
            parts,
            monthly_fee,
        })
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub fn exit_date(&self) -> NaiveDate {
        self.exit_date
    }

    pub fn holiday_count(&self) -> u32 {
        self.holiday_count
    }

    pub fn service_category(&self) -> &ServiceCategory {
        &self.service_category
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn monthly_fee(&self) -> Decimal {
        self.monthly_fee
    }
}

impl TryFrom<ScenarioRequest> for ScenarioInput {
    type Error = ScenarioInputError;

    fn try_from(request: ScenarioRequest) -> Result<Self, Self::Error> {
        Self::validate(request, CategoryPolicy::default())
    }
}

/// Rejections raised while turning a request into a [`ScenarioInput`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioInputError {
    #[error("exit date {exit} must be after entry date {entry}")]
    InvalidDateRange { entry: NaiveDate, exit: NaiveDate },
    #[error("holiday count must not be negative (got {0})")]
    InvalidHolidayCount(i64),
    #[error("{field} must be between 0 and {max} (got {value})", max = MAX_MONETARY_VALUE)]
    InvalidMonetaryValue { field: String, value: Decimal },
    #[error("unknown service category '{0}'")]
    UnknownServiceCategory(String),
    #[error("monthly fee is required when the plate is not in the billing base")]
    MissingMonthlyFee,
    #[error("either a plate or a customer name is required")]
    MissingIdentification,
}

/// Parses `YYYY-MM-DD`, RFC 3339, or `YYYY-MM-DDTHH:MM:SS`, dropping any time of day.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|dt| dt.date())
}

pub fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("'{raw}' is not a calendar date")))
}
