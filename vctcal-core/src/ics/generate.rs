//! ICS file generation.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component};

use crate::constants::X_PREFIX;
use crate::document::CalendarDocument;
use crate::error::VctResult;
use crate::event::Event;
use crate::season::Season;

/// Generate .ics content for a whole calendar document.
///
/// Output only depends on the document and season, so encoding an unchanged
/// document always yields the same bytes.
pub fn encode_document(document: &CalendarDocument, season: &Season) -> VctResult<String> {
    let mut cal = Calendar::new();

    for event in document {
        cal.push(to_ics_event(event));
    }

    let cal = cal.done();

    Ok(rewrite_calendar_header(&cal.to_string(), season))
}

fn to_ics_event(event: &Event) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(event.id.as_str());
    ics_event.summary(&escape_text(&event.title));
    ics_event.description(&escape_text(&event.description));

    // Overrides the wall-clock DTSTAMP icalendar stamps on new events
    ics_event.add_property("DTSTAMP", format_utc(event.stamp));
    ics_event.add_property("DTSTART", format_utc(event.start));
    ics_event.add_property("DTEND", format_utc(event.end));
    ics_event.add_property("STATUS", event.status.ics_status());

    if !event.source_reference.is_empty() {
        ics_event.add_property("URL", escape_text(&event.source_reference));
    }

    // Match facets, so decoding never depends on the rendered title
    let key = &event.key;
    ics_event.add_property(x("STAGE"), key.stage.token());
    ics_event.add_property(x("REGION"), key.region.token());
    ics_event.add_property(x("SEQUENCE"), key.sequence.to_string());
    ics_event.add_property(x("STATUS"), event.status.token());

    if let Some(name) = event.team_a.name() {
        ics_event.add_property(x("TEAM-A"), escape_text(name));
    }
    if let Some(name) = event.team_b.name() {
        ics_event.add_property(x("TEAM-B"), escape_text(name));
    }
    if let Some(score) = event.score {
        ics_event.add_property(x("SCORE"), score.to_string());
    }

    ics_event.done()
}

pub(crate) fn x(name: &str) -> String {
    format!("{X_PREFIX}{name}")
}

/// RFC 5545 TEXT escaping. icalendar writes property values as given.
pub(crate) fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Replace the calendar-level properties icalendar emits with our own header.
fn rewrite_calendar_header(ics: &str, season: &Season) -> String {
    let mut result = String::with_capacity(ics.len() + 256);
    let mut in_header = false;

    for line in ics.lines() {
        if line == "BEGIN:VCALENDAR" {
            result.push_str(line);
            result.push_str("\r\n");
            for header_line in header_lines(season) {
                result.push_str(&header_line);
                result.push_str("\r\n");
            }
            in_header = true;
            continue;
        }

        if in_header {
            if line.starts_with("BEGIN:") || line.starts_with("END:") {
                in_header = false;
            } else {
                continue;
            }
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

fn header_lines(season: &Season) -> Vec<String> {
    vec![
        format!("PRODID:-//vctcal//{}//EN", season.series_name),
        "VERSION:2.0".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{}", season.calendar_name),
        "X-WR-TIMEZONE:UTC".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MatchKey;
    use crate::model::{MatchStatus, Region, Round, Score, Sequence, Team};
    use chrono::TimeZone;

    fn make_test_event(season: &Season) -> Event {
        let key = MatchKey {
            stage: season.registry.resolve("kickoff").unwrap(),
            region: Region::new("Pacific"),
            sequence: Sequence::new(Round::Upper(1), 1),
        };
        let start = Utc.with_ymd_and_hms(2026, 1, 20, 9, 0, 0).unwrap();
        let mut event = Event {
            id: season.identity().identify(&key),
            key,
            team_a: Team::Resolved("Paper Rex".into()),
            team_b: Team::Unresolved,
            start,
            end: start + season.match_duration,
            status: MatchStatus::Completed,
            score: Some(Score { a: 2, b: 1 }),
            source_reference: "https://www.vlr.gg/600001/prx-vs-tbd".into(),
            title: String::new(),
            description: String::new(),
            stamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };
        event.rerender(season);
        event
    }

    #[test]
    fn test_header_is_replaced() {
        let season = Season::default();
        let ics = encode_document(&CalendarDocument::new(), &season).unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nPRODID:-//vctcal//VCT 2026//EN\r\n"));
        assert!(ics.contains("METHOD:PUBLISH\r\n"));
        assert!(ics.contains("X-WR-CALNAME:Valorant Champions Tour\r\n"));
        assert_eq!(ics.matches("VERSION:").count(), 1, "ICS:\n{}", ics);
        assert_eq!(ics.matches("PRODID:").count(), 1, "ICS:\n{}", ics);
        assert!(ics.trim_end().ends_with("END:VCALENDAR"));
    }

    #[test]
    fn test_event_properties() {
        let season = Season::default();
        let event = make_test_event(&season);
        let document = CalendarDocument::from_events(vec![event]).unwrap();
        let ics = encode_document(&document, &season).unwrap();

        assert!(ics.contains("UID:kickoff.pacific.ur1.1@vctcal"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTART:20260120T090000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20260120T110000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTAMP:20260101T000000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("STATUS:CONFIRMED"), "ICS:\n{}", ics);
        assert!(ics.contains("X-VCTCAL-TEAM-A:Paper Rex"), "ICS:\n{}", ics);
        assert!(ics.contains("X-VCTCAL-SCORE:2-1"), "ICS:\n{}", ics);
        assert!(!ics.contains("X-VCTCAL-TEAM-B"), "placeholder must not be written");
    }

    #[test]
    fn test_text_values_are_escaped() {
        assert_eq!(escape_text(r"Back\slash"), r"Back\\slash");
        assert_eq!(escape_text("a;b,c\nd"), r"a\;b\,c\nd");

        let season = Season::default();
        let mut event = make_test_event(&season);
        event.team_a = Team::Resolved(r"Back\slash, Inc".into());
        event.rerender(&season);
        let document = CalendarDocument::from_events(vec![event]).unwrap();
        let ics = encode_document(&document, &season).unwrap();

        assert!(ics.contains(r"X-VCTCAL-TEAM-A:Back\\slash\, Inc"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_encoding_is_stable() {
        let season = Season::default();
        let document = CalendarDocument::from_events(vec![make_test_event(&season)]).unwrap();
        let first = encode_document(&document, &season).unwrap();
        let second = encode_document(&document, &season).unwrap();
        assert_eq!(first, second);
    }
}
