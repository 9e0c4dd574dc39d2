use super::comparator::{compare, ComparisonError, ComparisonResult};
use super::domain::Part;
use super::evaluator::ScenarioResult;
use serde::{Deserialize, Serialize};

/// Scenarios required before the comparison can be started.
pub const MIN_SCENARIOS_FOR_COMPARISON: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkbenchId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkbenchMode {
    /// Parts and scenarios can be added.
    Collecting,
    /// The scenario list is frozen until a restart.
    Comparing,
}

impl WorkbenchMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Collecting => "Collecting scenarios",
            Self::Comparing => "Comparing scenarios",
        }
    }
}

/// Per-session scenario comparison state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioWorkbench {
    pub id: WorkbenchId,
    mode: WorkbenchMode,
    pending_parts: Vec<Part>,
    scenarios: Vec<ScenarioResult>,
}

impl ScenarioWorkbench {
    pub fn new(id: WorkbenchId) -> Self {
        Self {
            id,
            mode: WorkbenchMode::Collecting,
            pending_parts: Vec::new(),
            scenarios: Vec::new(),
        }
    }

    pub fn mode(&self) -> WorkbenchMode {
        self.mode
    }

    pub fn pending_parts(&self) -> &[Part] {
        &self.pending_parts
    }

    pub fn scenarios(&self) -> &[ScenarioResult] {
        &self.scenarios
    }

    pub fn can_compare(&self) -> bool {
        self.scenarios.len() >= MIN_SCENARIOS_FOR_COMPARISON
    }

    pub fn ensure_collecting(&self) -> Result<(), WorkbenchError> {
        match self.mode {
            WorkbenchMode::Collecting => Ok(()),
            WorkbenchMode::Comparing => Err(WorkbenchError::ComparisonInProgress),
        }
    }

    /// Stages a part for the next scenario. Names must be non-blank and values positive.
    pub fn add_part(&mut self, part: Part) -> Result<(), WorkbenchError> {
        self.ensure_collecting()?;

        let name = part.name.trim();
        if name.is_empty() {
            return Err(WorkbenchError::InvalidPart("part name is required".to_string()));
        }
        if part.value <= rust_decimal::Decimal::ZERO {
            return Err(WorkbenchError::InvalidPart(format!(
                "part '{name}' must have a positive value"
            )));
        }

        self.pending_parts.push(Part::new(name, part.value));
        Ok(())
    }

    /// Drops every staged part whose name is listed, returning how many were removed.
    pub fn remove_parts(&mut self, names: &[String]) -> Result<usize, WorkbenchError> {
        self.ensure_collecting()?;

        let before = self.pending_parts.len();
        self.pending_parts
            .retain(|part| !names.iter().any(|name| name.trim() == part.name));
        Ok(before - self.pending_parts.len())
    }

    /// Appends an evaluated scenario and clears the staged parts, returning its 1-based number.
    pub fn record_scenario(&mut self, result: ScenarioResult) -> Result<usize, WorkbenchError> {
        self.ensure_collecting()?;

        self.scenarios.push(result);
        self.pending_parts.clear();
        Ok(self.scenarios.len())
    }

    /// Freezes the list and selects the cheapest scenario. Repeat calls recompute the same result.
    pub fn begin_comparison(&mut self) -> Result<ComparisonResult, WorkbenchError> {
        if !self.can_compare() {
            return Err(WorkbenchError::NotEnoughScenarios {
                required: MIN_SCENARIOS_FOR_COMPARISON,
                available: self.scenarios.len(),
            });
        }

        let comparison = compare(&self.scenarios)?;
        self.mode = WorkbenchMode::Comparing;
        Ok(comparison)
    }

    /// Current comparison, present only while in [`WorkbenchMode::Comparing`].
    pub fn comparison(&self) -> Option<ComparisonResult> {
        match self.mode {
            WorkbenchMode::Comparing => compare(&self.scenarios).ok(),
            WorkbenchMode::Collecting => None,
        }
    }

    pub fn restart(&mut self) {
        self.mode = WorkbenchMode::Collecting;
        self.pending_parts.clear();
        self.scenarios.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkbenchError {
    #[error("comparison in progress; restart the workbench to change scenarios")]
    ComparisonInProgress,
    #[error("comparison needs at least {required} scenarios (have {available})")]
    NotEnoughScenarios { required: usize, available: usize },
    #[error("invalid part: {0}")]
    InvalidPart(String),
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}
