use std::fmt;

use serde::Serialize;

use crate::event::Event;
use crate::merge::MergeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    Create,
    Update,
}

impl ChangeKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            ChangeKind::Create => "+",
            ChangeKind::Update => "~",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One event written by a merge. `old` is the stored version for updates.
#[derive(Debug, Clone)]
pub struct EventChange {
    pub kind: ChangeKind,
    pub old: Option<Event>,
    pub new: Event,
}

impl EventChange {
    pub(crate) fn created(event: Event) -> Self {
        EventChange {
            kind: ChangeKind::Create,
            old: None,
            new: event,
        }
    }

    pub(crate) fn updated(old: Event, new: Event) -> Self {
        EventChange {
            kind: ChangeKind::Update,
            old: Some(old),
            new,
        }
    }

    pub fn event(&self) -> &Event {
        &self.new
    }
}

impl fmt::Display for EventChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.new)
    }
}

/// What one merge did, per match in the batch.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub mode: MergeMode,
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Update mode: matches with no event to refresh.
    pub skipped_new: usize,
    /// Matches without a start time, which cannot create events.
    pub skipped_no_time: usize,
    /// Fetched statuses behind the stored one, left unapplied.
    pub regressions_ignored: usize,
    /// Repeated triples within the batch; the first occurrence wins.
    pub duplicates: usize,
    pub changes: Vec<EventChange>,
}

impl MergeReport {
    pub fn new(mode: MergeMode) -> Self {
        MergeReport {
            mode,
            added: 0,
            updated: 0,
            unchanged: 0,
            skipped_new: 0,
            skipped_no_time: 0,
            regressions_ignored: 0,
            duplicates: 0,
            changes: Vec::new(),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped_new + self.skipped_no_time
    }

    /// Fold another stage's report into this one.
    pub fn absorb(&mut self, other: MergeReport) {
        self.added += other.added;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.skipped_new += other.skipped_new;
        self.skipped_no_time += other.skipped_no_time;
        self.regressions_ignored += other.regressions_ignored;
        self.duplicates += other.duplicates;
        self.changes.extend(other.changes);
    }
}
