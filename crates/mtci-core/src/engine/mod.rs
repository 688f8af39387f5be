pub mod runner;
pub mod session;

pub use runner::{RunPolicy, Runner, BUDGET_EXCEEDED};
pub use session::{run_profile, run_with_model, SessionOptions, SessionOutcome};
