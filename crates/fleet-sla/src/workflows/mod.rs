pub mod billing;
pub mod sla;
