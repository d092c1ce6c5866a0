//! Fetch stages concurrently, merge them one at a time.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::document::CalendarDocument;
use crate::error::{VctError, VctResult};
use crate::merge::{MergeEngine, MergeMode};
use crate::model::{Match, Stage};
use crate::source::MatchSource;
use crate::sync::{RunSummary, StageFailure, StageRun};

/// Result of fetching a set of stages.
#[derive(Default)]
pub struct Fetched {
    pub batches: BTreeMap<Stage, Vec<Match>>,
    pub failures: Vec<StageFailure>,
}

pub struct Orchestrator {
    engine: MergeEngine,
    source: Arc<dyn MatchSource>,
    concurrency: usize,
}

impl Orchestrator {
    pub fn new(engine: MergeEngine, source: Arc<dyn MatchSource>, concurrency: usize) -> Self {
        Orchestrator {
            engine,
            source,
            concurrency: concurrency.max(1),
        }
    }

    pub fn engine(&self) -> &MergeEngine {
        &self.engine
    }

    /// Resolve user-supplied stage tokens, then [`run_stages`](Self::run_stages).
    /// Unknown tokens are reported in the summary; the rest still run.
    pub async fn run(
        &self,
        document: &CalendarDocument,
        tokens: &[String],
        mode: MergeMode,
        now: DateTime<Utc>,
    ) -> VctResult<(CalendarDocument, RunSummary)> {
        let registry = &self.engine.season().registry;
        let mut stages = BTreeSet::new();
        let mut unknown = Vec::new();

        for token in tokens {
            match registry.resolve(token) {
                Ok(stage) => {
                    stages.insert(stage);
                }
                Err(e) => {
                    warn!(token = %token, "skipping unknown stage");
                    unknown.push((token.clone(), e));
                }
            }
        }

        let (document, mut summary) = self.run_stages(document, &stages, mode, now).await?;
        for (token, e) in unknown {
            summary.fail(token, e);
        }
        Ok((document, summary))
    }

    /// Fetch every stage, then apply the batches in stage order.
    ///
    /// Stage failures are collected in the summary. Identity conflicts and
    /// document corruption abort the run and nothing is returned.
    pub async fn run_stages(
        &self,
        document: &CalendarDocument,
        stages: &BTreeSet<Stage>,
        mode: MergeMode,
        now: DateTime<Utc>,
    ) -> VctResult<(CalendarDocument, RunSummary)> {
        let fetched = self.fetch(stages).await?;
        let (document, mut summary) = self.apply(document, &fetched.batches, mode, now)?;
        summary.failures.extend(fetched.failures);
        Ok((document, summary))
    }

    /// Fetch stages concurrently, at most `concurrency` at a time.
    pub async fn fetch(&self, stages: &BTreeSet<Stage>) -> VctResult<Fetched> {
        let registry = &self.engine.season().registry;
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut task_stages = HashMap::new();

        for stage in stages {
            let Some(def) = registry.def(stage).cloned() else {
                continue;
            };
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let stage = stage.clone();

            let task_stage = stage.clone();
            let handle = tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => source.fetch_stage(&stage, &def).await,
                    Err(e) => Err(VctError::retrieval(&stage, e)),
                };
                (stage, result)
            });
            task_stages.insert(handle.id(), task_stage);
        }

        let mut fetched = Fetched::default();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((stage, Ok(batch))) => {
                    let total = batch.len();
                    let batch: Vec<Match> =
                        batch.into_iter().filter(|m| m.stage == stage).collect();
                    if batch.len() != total {
                        warn!(stage = %stage, dropped = total - batch.len(), "source returned matches for another stage");
                    }
                    debug!(stage = %stage, matches = batch.len(), "fetched stage");
                    fetched.batches.insert(stage, batch);
                }
                Ok((_, Err(e))) if e.is_fatal() => return Err(e),
                Ok((stage, Err(e))) => {
                    warn!(stage = %stage, error = %e, "stage fetch failed");
                    fetched.failures.push(StageFailure {
                        stage: stage.to_string(),
                        error: e,
                    });
                }
                Err(e) => {
                    let stage = task_stages
                        .get(&e.id())
                        .map(Stage::to_string)
                        .unwrap_or_else(|| "unknown".to_string());
                    error!(stage = %stage, error = %e, "stage fetch task failed");
                    fetched.failures.push(StageFailure {
                        error: VctError::retrieval(&stage, e),
                        stage,
                    });
                }
            }
        }

        Ok(fetched)
    }

    /// Merge fetched batches into `document`, one stage at a time in stage order.
    pub fn apply(
        &self,
        document: &CalendarDocument,
        batches: &BTreeMap<Stage, Vec<Match>>,
        mode: MergeMode,
        now: DateTime<Utc>,
    ) -> VctResult<(CalendarDocument, RunSummary)> {
        let mut summary = RunSummary::new(mode);

        // Generating several stages builds one fresh document from all of them
        let (mut current, per_stage_mode) = match mode {
            MergeMode::Generate => (CalendarDocument::new(), MergeMode::GenerateAppend),
            other => (document.clone(), other),
        };

        for (stage, batch) in batches {
            let (next, mut report) = self.engine.merge(&current, batch, per_stage_mode, now)?;
            report.mode = mode;

            info!(
                stage = %stage,
                added = report.added,
                updated = report.updated,
                unchanged = report.unchanged,
                skipped = report.skipped(),
                "merged stage"
            );

            current = next;
            summary.stages.push(StageRun {
                stage: stage.clone(),
                report,
            });
        }

        Ok((current, summary))
    }
}
