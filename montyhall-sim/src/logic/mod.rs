pub mod plan;
pub mod reports;
pub mod seeds;

pub use plan::RunPlan;
pub use seeds::{SeedInfo, resolve_seed};
