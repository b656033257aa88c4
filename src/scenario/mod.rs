pub mod generate;
pub mod model;

pub use generate::{generate_scenario, ScenarioConfig};
pub use model::{InMemoryLedger, ScenarioError, ScenarioFile};
