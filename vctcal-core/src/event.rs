//! The persisted form of a match.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::identity::{EventId, MatchKey};
use crate::model::{Match, MatchStatus, Score, Team};
use crate::season::Season;

/// A calendar event for one match.
///
/// `title` and `description` are always rendered from the other fields; use
/// [`Event::rerender`] after changing any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    /// Identity facets, carried alongside the id they derive.
    pub key: MatchKey,
    pub team_a: Team,
    pub team_b: Team,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: MatchStatus,
    pub score: Option<Score>,
    pub source_reference: String,
    pub title: String,
    pub description: String,
    /// DTSTAMP: when this event was created or last changed.
    pub stamp: DateTime<Utc>,
}

impl Event {
    /// First appearance of a match in the calendar.
    pub fn create(
        id: EventId,
        m: &Match,
        start: DateTime<Utc>,
        season: &Season,
        stamp: DateTime<Utc>,
    ) -> Self {
        let mut event = Event {
            id,
            key: m.key(),
            team_a: m.team_a.clone(),
            team_b: m.team_b.clone(),
            start,
            end: start + season.match_duration,
            status: m.status,
            score: m.score,
            source_reference: m.source_reference.clone(),
            title: String::new(),
            description: String::new(),
            stamp,
        };
        event.rerender(season);
        event
    }

    pub fn rerender(&mut self, season: &Season) {
        self.title = season.title(&self.key, &self.team_a, &self.team_b);
        self.description = season.description(&self.source_reference, self.status, self.score);
    }

    /// Move the match, keeping the block length policy.
    pub fn reschedule(&mut self, start: DateTime<Utc>, season: &Season) {
        self.start = start;
        self.end = start + season.match_duration;
    }

    /// Whether any part of the match is still ahead of `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.end >= now
    }

    pub fn render_event_time(&self) -> String {
        self.start.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
