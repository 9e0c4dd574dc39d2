use super::evaluator::ScenarioResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Scenario list together with the cheapest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub scenarios: Vec<ScenarioResult>,
    /// Zero-based position of `best_scenario` within `scenarios`.
    pub best_index: usize,
    pub best_scenario: ScenarioResult,
}

impl ComparisonResult {
    /// How much more each scenario costs than the best one, in list order.
    pub fn premiums_over_best(&self) -> Vec<Decimal> {
        self.scenarios
            .iter()
            .map(|scenario| scenario.final_total - self.best_scenario.final_total)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    #[error("at least one scenario is required for a comparison")]
    EmptyScenarioList,
}

/// Picks the scenario with the lowest final total; the earliest one wins a tie.
pub fn compare(scenarios: &[ScenarioResult]) -> Result<ComparisonResult, ComparisonError> {
    let (best_index, best) = scenarios
        .iter()
        .enumerate()
        .reduce(|best, candidate| {
            if candidate.1.final_total < best.1.final_total {
                candidate
            } else {
                best
            }
        })
        .ok_or(ComparisonError::EmptyScenarioList)?;

    Ok(ComparisonResult {
        scenarios: scenarios.to_vec(),
        best_index,
        best_scenario: best.clone(),
    })
}
