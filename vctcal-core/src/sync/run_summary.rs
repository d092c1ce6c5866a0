//! Per-stage aggregation of one run.

use crate::error::VctError;
use crate::merge::{MergeMode, MergeReport};
use crate::model::Stage;

pub struct StageRun {
    pub stage: Stage,
    pub report: MergeReport,
}

/// A stage that could not be fetched or was not recognized.
pub struct StageFailure {
    /// The stage token as requested.
    pub stage: String,
    pub error: VctError,
}

pub struct RunSummary {
    pub mode: MergeMode,
    pub stages: Vec<StageRun>,
    pub failures: Vec<StageFailure>,
}

impl RunSummary {
    pub fn new(mode: MergeMode) -> Self {
        RunSummary {
            mode,
            stages: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.stages.iter().any(|s| s.report.has_changes())
    }

    pub(crate) fn fail(&mut self, stage: impl ToString, error: VctError) {
        self.failures.push(StageFailure {
            stage: stage.to_string(),
            error,
        });
    }

    /// All stage reports folded into one.
    pub fn totals(&self) -> MergeReport {
        let mut totals = MergeReport::new(self.mode);
        for run in &self.stages {
            totals.absorb(run.report.clone());
        }
        totals
    }
}
