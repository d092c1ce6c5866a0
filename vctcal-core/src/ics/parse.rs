//! ICS file parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Property, read_calendar, unfold},
};

use super::generate::x;
use crate::document::CalendarDocument;
use crate::error::{VctError, VctResult};
use crate::event::Event;
use crate::identity::{EventId, IdentityScheme, MatchKey};
use crate::model::{MatchStatus, Region, Score, Sequence, Team};
use crate::season::Season;

/// Property values of one VEVENT, unescaped, before interpretation.
#[derive(Debug, Default)]
struct RawEvent {
    uid: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    stamp: Option<String>,
    ics_status: Option<String>,
    url: Option<String>,
    stage: Option<String>,
    region: Option<String>,
    sequence: Option<String>,
    status: Option<String>,
    team_a: Option<String>,
    team_b: Option<String>,
    score: Option<String>,
}

/// Parse a whole calendar file.
///
/// Title and description are rebuilt from the stored facets rather than read
/// back, so they always follow the current rendering rules.
pub fn decode_document(content: &str, season: &Season) -> VctResult<CalendarDocument> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded)
        .map_err(|e| VctError::CorruptDocument(format!("unreadable calendar: {e}")))?;

    let scheme = season.identity();
    let mut events = Vec::new();

    for vevent in calendar.components.iter().filter(|c| c.name == "VEVENT") {
        let text = |name: &str| {
            vevent
                .find_prop(name)
                .map(|p| unescape_text(p.val.as_ref()))
        };

        let raw = RawEvent {
            uid: text("UID"),
            start: vevent.find_prop("DTSTART").map(to_utc).transpose()?,
            end: vevent.find_prop("DTEND").map(to_utc).transpose()?,
            stamp: text("DTSTAMP"),
            ics_status: text("STATUS"),
            url: text("URL"),
            stage: text(&x("STAGE")),
            region: text(&x("REGION")),
            sequence: text(&x("SEQUENCE")),
            status: text(&x("STATUS")),
            team_a: text(&x("TEAM-A")),
            team_b: text(&x("TEAM-B")),
            score: text(&x("SCORE")),
        };

        events.push(into_event(raw, &scheme, season)?);
    }

    CalendarDocument::from_events(events)
}

fn into_event(raw: RawEvent, scheme: &IdentityScheme, season: &Season) -> VctResult<Event> {
    let uid = raw
        .uid
        .filter(|uid| !uid.trim().is_empty())
        .ok_or_else(|| VctError::CorruptDocument("event without UID".into()))?;
    let id = EventId::from_uid(&uid);
    let corrupt = |what: String| VctError::CorruptDocument(format!("{id}: {what}"));

    let key = match (&raw.stage, &raw.region, &raw.sequence) {
        (Some(stage), Some(region), Some(sequence)) => MatchKey {
            stage: season.registry.resolve(stage).map_err(|e| corrupt(e.to_string()))?,
            region: Region::new(region),
            sequence: sequence.parse::<Sequence>().map_err(corrupt)?,
        },
        // Hand-edited or older files: the id itself carries the triple
        _ => scheme.decompose(&id)?,
    };
    scheme.verify(&id, &key)?;

    let start = raw
        .start
        .ok_or_else(|| corrupt("missing DTSTART".into()))?;
    let end = raw.end.unwrap_or(start + season.match_duration);

    let status = match (&raw.status, &raw.ics_status) {
        (Some(status), _) => status.parse::<MatchStatus>().map_err(corrupt)?,
        (None, Some(ics)) if ics.eq_ignore_ascii_case("CONFIRMED") => MatchStatus::Completed,
        _ => MatchStatus::Scheduled,
    };

    let score = raw
        .score
        .as_deref()
        .map(str::parse::<Score>)
        .transpose()
        .map_err(corrupt)?;

    let stamp = match raw.stamp.as_deref() {
        Some(value) => parse_utc_stamp(value).ok_or_else(|| corrupt(format!("bad DTSTAMP '{value}'")))?,
        None => start,
    };

    let mut event = Event {
        id,
        key,
        team_a: raw.team_a.as_deref().map(Team::from_source).unwrap_or_default(),
        team_b: raw.team_b.as_deref().map(Team::from_source).unwrap_or_default(),
        start,
        end,
        status,
        score,
        source_reference: raw.url.unwrap_or_default(),
        title: String::new(),
        description: String::new(),
        stamp,
    };
    event.rerender(season);
    Ok(event)
}

/// Resolve DTSTART/DTEND to an instant. All-day values have no match time.
fn to_utc(prop: &Property) -> VctResult<DateTime<Utc>> {
    let raw = prop.val.as_ref().to_string();
    let dpt = DatePerhapsTime::try_from(prop)
        .map_err(|_| VctError::CorruptDocument(format!("unreadable date-time '{raw}'")))?;

    match dpt {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Ok(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => Ok(naive.and_utc()),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz: chrono_tz::Tz = tzid
                .parse()
                .map_err(|_| VctError::CorruptDocument(format!("unknown TZID '{tzid}'")))?;
            tz.from_local_datetime(&date_time)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| {
                    VctError::CorruptDocument(format!("'{raw}' does not exist in {tzid}"))
                })
        }
        DatePerhapsTime::Date(_) => Err(VctError::CorruptDocument(format!(
            "all-day value '{raw}' where a match time was expected"
        ))),
    }
}

fn parse_utc_stamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim().trim_end_matches('Z'), "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Undo RFC 5545 TEXT escaping.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
