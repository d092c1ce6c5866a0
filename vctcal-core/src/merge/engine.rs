//! The merge engine: field-level policies for generate, append and update.

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info};

use crate::document::CalendarDocument;
use crate::error::VctResult;
use crate::event::Event;
use crate::identity::{Claim, IdLedger, IdentityScheme};
use crate::merge::{EventChange, MergeMode, MergeReport};
use crate::model::{Match, StatusTransition};
use crate::season::Season;

pub struct MergeEngine {
    season: Season,
    scheme: IdentityScheme,
}

/// Result of refreshing one stored event from one fetched match.
#[derive(Debug, Default)]
struct Refresh {
    changed: bool,
    regression: bool,
}

impl MergeEngine {
    pub fn new(season: Season) -> Self {
        let scheme = season.identity();
        MergeEngine { season, scheme }
    }

    pub fn season(&self) -> &Season {
        &self.season
    }

    /// Combine `batch` with `document` under `mode`.
    ///
    /// The input document is left untouched; on error nothing of the batch
    /// has been applied anywhere. `now` stamps created and changed events.
    /// Times are kept to whole seconds, the precision of the .ics file.
    pub fn merge(
        &self,
        document: &CalendarDocument,
        batch: &[Match],
        mode: MergeMode,
        now: DateTime<Utc>,
    ) -> VctResult<(CalendarDocument, MergeReport)> {
        let now = now.trunc_subsecs(0);
        let mut next = match mode {
            MergeMode::Generate => CalendarDocument::new(),
            MergeMode::GenerateAppend | MergeMode::Update => document.clone(),
        };
        let mut report = MergeReport::new(mode);
        let mut ledger = IdLedger::default();
        let mut created = Vec::new();

        for m in batch {
            let key = m.key();
            let id = self.scheme.identify(&key);

            if ledger.claim(&id, &key)? == Claim::Repeat {
                debug!(id = %id, "duplicate match in batch, keeping first");
                report.duplicates += 1;
                continue;
            }

            if mode.creates_events() {
                if let Some(existing) = next.get(&id) {
                    self.scheme.verify(&id, &existing.key)?;
                    report.unchanged += 1;
                    continue;
                }

                let Some(start) = m.scheduled_time.map(|t| t.trunc_subsecs(0)) else {
                    debug!(id = %id, "match has no time yet, not creating");
                    report.skipped_no_time += 1;
                    continue;
                };

                let event = Event::create(id, m, start, &self.season, now);
                report.added += 1;
                report.changes.push(EventChange::created(event.clone()));
                created.push(event);
            } else {
                let Some(existing) = next.get_mut(&id) else {
                    report.skipped_new += 1;
                    continue;
                };
                self.scheme.verify(&id, &existing.key)?;

                let before = existing.clone();
                let refresh = self.refresh(existing, m, now);

                if refresh.regression {
                    report.regressions_ignored += 1;
                }
                if refresh.changed {
                    report.updated += 1;
                    report
                        .changes
                        .push(EventChange::updated(before, existing.clone()));
                } else {
                    report.unchanged += 1;
                }
            }
        }

        next.append_new(created)?;

        Ok((next, report))
    }

    fn refresh(&self, event: &mut Event, m: &Match, now: DateTime<Utc>) -> Refresh {
        let mut refresh = Refresh::default();

        if let Some(team) = event.team_a.superseded_by(&m.team_a) {
            event.team_a = team;
            refresh.changed = true;
        }
        if let Some(team) = event.team_b.superseded_by(&m.team_b) {
            event.team_b = team;
            refresh.changed = true;
        }

        if let Some(start) = m
            .scheduled_time
            .map(|t| t.trunc_subsecs(0))
            .filter(|start| *start != event.start)
        {
            event.reschedule(start, &self.season);
            refresh.changed = true;
        }

        match event.status.transition_to(m.status) {
            StatusTransition::Advanced(status) => {
                event.status = status;
                refresh.changed = true;
            }
            StatusTransition::Unchanged => {}
            StatusTransition::Regression => {
                info!(
                    id = %event.id,
                    stored = %event.status,
                    fetched = %m.status,
                    "status regression ignored"
                );
                refresh.regression = true;
            }
        }

        // An absent score never erases a known one
        if let Some(score) = m.score.filter(|score| event.score != Some(*score)) {
            event.score = Some(score);
            refresh.changed = true;
        }

        if refresh.changed {
            event.rerender(&self.season);
            event.stamp = now;
        }

        refresh
    }
}
