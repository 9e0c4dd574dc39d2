pub mod views;

pub use views::{
    BestScenarioView, ComparisonReportView, CustomerAccountView, PartView, ScenarioReportView,
};
