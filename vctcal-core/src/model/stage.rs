//! Stages of the season and the registry that knows about them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{VctError, VctResult};

/// A validated stage token (e.g. `kickoff`).
///
/// Only a [`StageRegistry`] hands these out, so holding a `Stage` means the
/// token was recognized.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Stage(String);

impl Stage {
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-stage settings from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
    /// Display name used in event titles ("Kickoff", "Stage 1").
    pub name: String,

    /// Stage id on vlr.gg (`/vct/?stage=<id>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlr_id: Option<u32>,

    #[serde(default)]
    pub active: bool,

    /// Overrides for bracket labels, keyed by round code (`ur2 = "Upper Semifinal"`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub round_labels: BTreeMap<String, String>,
}

impl StageDef {
    fn new(name: &str, vlr_id: u32, active: bool) -> Self {
        StageDef {
            name: name.to_string(),
            vlr_id: Some(vlr_id),
            active,
            round_labels: BTreeMap::new(),
        }
    }
}

/// The closed set of stages this season knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageRegistry {
    stages: BTreeMap<String, StageDef>,
}

impl Default for StageRegistry {
    fn default() -> Self {
        let stages = [
            ("kickoff", StageDef::new("Kickoff", 45, true)),
            ("masters", StageDef::new("Masters", 46, false)),
            ("stage1", StageDef::new("Stage 1", 1, false)),
            ("stage2", StageDef::new("Stage 2", 16, false)),
            ("champions", StageDef::new("Champions", 47, false)),
        ]
        .into_iter()
        .map(|(token, def)| (token.to_string(), def))
        .collect();

        StageRegistry { stages }
    }
}

impl StageRegistry {
    /// Build a registry, rejecting tokens that could not appear inside an event id.
    pub fn new(stages: BTreeMap<String, StageDef>) -> VctResult<Self> {
        if stages.is_empty() {
            return Err(VctError::Config("stage registry is empty".into()));
        }

        for token in stages.keys() {
            let valid = !token.is_empty()
                && token
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if !valid {
                return Err(VctError::Config(format!(
                    "invalid stage token '{token}': use lowercase letters, digits and '-'"
                )));
            }
        }

        Ok(StageRegistry { stages })
    }

    /// Look up a user- or file-supplied token.
    pub fn resolve(&self, token: &str) -> VctResult<Stage> {
        let normalized = token.trim().to_ascii_lowercase();

        if self.stages.contains_key(&normalized) {
            Ok(Stage(normalized))
        } else {
            Err(VctError::UnknownStage {
                token: token.to_string(),
                known: self.tokens().collect::<Vec<_>>().join(", "),
            })
        }
    }

    pub fn definitions(&self) -> &BTreeMap<String, StageDef> {
        &self.stages
    }

    pub fn def(&self, stage: &Stage) -> Option<&StageDef> {
        self.stages.get(stage.token())
    }

    pub fn display_name(&self, stage: &Stage) -> String {
        self.def(stage)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| stage.token().to_string())
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.stages.keys().map(String::as_str)
    }

    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages.keys().map(|t| Stage(t.clone()))
    }

    /// First stage flagged `active`, used when no stage is named explicitly.
    pub fn active_stage(&self) -> Option<Stage> {
        self.stages
            .iter()
            .find(|(_, def)| def.active)
            .map(|(token, _)| Stage(token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive() {
        let registry = StageRegistry::default();
        let stage = registry.resolve(" Kickoff ").unwrap();
        assert_eq!(stage.token(), "kickoff");
        assert_eq!(registry.display_name(&stage), "Kickoff");
    }

    #[test]
    fn resolve_unknown_lists_known_tokens() {
        let registry = StageRegistry::default();
        let err = registry.resolve("playoffs").unwrap_err();
        match err {
            VctError::UnknownStage { token, known } => {
                assert_eq!(token, "playoffs");
                assert!(known.contains("masters"), "got {known}");
            }
            other => panic!("Expected UnknownStage, got {other:?}"),
        }
    }

    #[test]
    fn rejects_tokens_with_separator_characters() {
        let mut stages = BTreeMap::new();
        stages.insert("stage.1".to_string(), StageDef::new("Stage 1", 1, true));
        assert!(StageRegistry::new(stages).is_err());
    }

    #[test]
    fn default_active_stage_is_kickoff() {
        let registry = StageRegistry::default();
        assert_eq!(registry.active_stage().unwrap().token(), "kickoff");
    }
}
