//! Match times as vlr.gg prints them, converted to UTC.
//!
//! Two layouts appear on match cards:
//! - `11:00 pm WIB, Jan 20` (older pages, explicit zone marker)
//! - `Mar 1 ... 12:00 am` (current cards, date and time apart)
//!
//! Neither carries a year; the season's year is assumed.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

static WIB_LAYOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}:\d{2})\s*([ap]m)\s*WIB,?\s*([a-z]{3})[a-z]*\.?\s*(\d{1,2})")
        .expect("valid regex")
});

static CARD_LAYOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d{1,2})\b.*?\b(\d{1,2}:\d{2})\s*([ap]m)\b",
    )
    .expect("valid regex")
});

/// Pull the date-time out of a card's text as `"11:00 pm Jan 20"`.
pub fn extract_datetime_text(card_text: &str) -> Option<String> {
    let compact = card_text.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(caps) = WIB_LAYOUT.captures(&compact) {
        return Some(format!("{} {} {} {}", &caps[1], &caps[2], &caps[3], &caps[4]));
    }

    CARD_LAYOUT
        .captures(&compact)
        .map(|caps| format!("{} {} {} {}", &caps[3], &caps[4], &caps[1], &caps[2]))
}

/// Parse `"11:00 pm Jan 20"` in the given year.
pub fn parse_local(text: &str, year: i32) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{text} {year}"), "%I:%M %p %b %d %Y").ok()
}

pub fn to_utc(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Card text to a UTC start time, if the card shows one.
pub fn card_start_time(card_text: &str, year: i32, tz: Tz) -> Option<DateTime<Utc>> {
    let text = extract_datetime_text(card_text)?;
    to_utc(parse_local(&text, year)?, tz)
}
