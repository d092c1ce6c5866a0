//! Immutable per-run settings shared by the identity scheme, merge engine and codec.

use chrono::Duration;

use crate::constants::DEFAULT_MATCH_DURATION_HOURS;
use crate::identity::{IdentityScheme, MatchKey};
use crate::model::{MatchStatus, Score, StageRegistry, Team};

#[derive(Debug, Clone)]
pub struct Season {
    /// Prefix of every event title ("VCT 2026").
    pub series_name: String,
    /// X-WR-CALNAME of generated calendars.
    pub calendar_name: String,
    pub registry: StageRegistry,
    /// Length of the block each match occupies.
    pub match_duration: Duration,
}

impl Default for Season {
    fn default() -> Self {
        Season {
            series_name: "VCT 2026".to_string(),
            calendar_name: "Valorant Champions Tour".to_string(),
            registry: StageRegistry::default(),
            match_duration: Duration::hours(DEFAULT_MATCH_DURATION_HOURS),
        }
    }
}

impl Season {
    pub fn identity(&self) -> IdentityScheme {
        IdentityScheme::new(self.registry.clone())
    }

    /// Bracket label for titles. Stages may rename rounds in config; the
    /// label never feeds back into identity.
    pub fn round_label(&self, key: &MatchKey) -> String {
        let code = key.sequence.round.code();
        self.registry
            .def(&key.stage)
            .and_then(|def| def.round_labels.get(&code))
            .cloned()
            .unwrap_or_else(|| key.sequence.round.default_label())
    }

    pub fn title(&self, key: &MatchKey, team_a: &Team, team_b: &Team) -> String {
        let mut event_name = format!(
            "{} {}",
            self.series_name,
            self.registry.display_name(&key.stage)
        );
        if let Some(region) = key.region.display_name() {
            event_name.push(' ');
            event_name.push_str(&region);
        }

        format!(
            "{} - {} vs {} ({})",
            event_name,
            team_a,
            team_b,
            self.round_label(key)
        )
    }

    pub fn description(
        &self,
        source_reference: &str,
        status: MatchStatus,
        score: Option<Score>,
    ) -> String {
        let mut lines = Vec::new();
        if !source_reference.is_empty() {
            lines.push(format!("Watch: {source_reference}"));
        }
        lines.push(format!("Status: {status}"));
        if let Some(score) = score {
            lines.push(format!("Score: {score}"));
        }
        lines.join("\n")
    }
}
