use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identity::MatchKey;
use crate::model::{MatchStatus, Region, Score, Sequence, Stage, Team};

/// A schedule entry as reported by a [`MatchSource`](crate::source::MatchSource).
///
/// Short-lived: produced by one fetch and consumed by one merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub stage: Stage,
    pub region: Region,
    pub sequence: Sequence,
    pub team_a: Team,
    pub team_b: Team,
    /// Start time in UTC; `None` while the source has not published one.
    pub scheduled_time: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    pub score: Option<Score>,
    /// Link back to the listing. Never part of identity.
    pub source_reference: String,
}

impl Match {
    pub fn key(&self) -> MatchKey {
        MatchKey {
            stage: self.stage.clone(),
            region: self.region.clone(),
            sequence: self.sequence,
        }
    }
}
