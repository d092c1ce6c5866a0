//! Running fetch and merge across several stages.

mod orchestrator;
mod run_summary;

pub use orchestrator::{Fetched, Orchestrator};
pub use run_summary::{RunSummary, StageFailure, StageRun};
