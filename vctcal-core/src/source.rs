//! The seam between the core and whatever supplies match listings.

use async_trait::async_trait;

use crate::error::VctResult;
use crate::model::{Match, Stage, StageDef};

/// A provider of match listings for one stage at a time.
///
/// Implementations own their retry, delay and timeout policy. A failure is
/// reported as [`VctError::Retrieval`](crate::error::VctError::Retrieval) and
/// only affects that stage.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn fetch_stage(&self, stage: &Stage, def: &StageDef) -> VctResult<Vec<Match>>;
}
