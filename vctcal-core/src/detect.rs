//! Inferring which stages a calendar already holds.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::document::CalendarDocument;
use crate::model::Stage;

/// Stages with at least one event in the document.
pub fn detect_stages(document: &CalendarDocument) -> BTreeSet<Stage> {
    document.iter().map(|e| e.key.stage.clone()).collect()
}

/// Stages with at least one event that has not finished by `now`.
pub fn detect_upcoming(document: &CalendarDocument, now: DateTime<Utc>) -> BTreeSet<Stage> {
    document
        .iter()
        .filter(|e| e.is_upcoming(now))
        .map(|e| e.key.stage.clone())
        .collect()
}
