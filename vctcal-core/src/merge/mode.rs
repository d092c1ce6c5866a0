use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeMode {
    /// Fresh document built from the batch alone.
    Generate,
    /// Add events for matches not yet in the document; never touch existing ones.
    GenerateAppend,
    /// Refresh existing events; never create new ones.
    Update,
}

impl MergeMode {
    pub fn creates_events(&self) -> bool {
        matches!(self, MergeMode::Generate | MergeMode::GenerateAppend)
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMode::Generate => write!(f, "generate"),
            MergeMode::GenerateAppend => write!(f, "generate-append"),
            MergeMode::Update => write!(f, "update"),
        }
    }
}
