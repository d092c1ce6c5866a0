//! Reconciling fetched matches with a persisted calendar.

mod engine;
mod mode;
mod report;

pub use engine::MergeEngine;
pub use mode::MergeMode;
pub use report::{ChangeKind, EventChange, MergeReport};
