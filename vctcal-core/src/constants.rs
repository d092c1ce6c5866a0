/// Domain part of every event UID. Changing it changes every identity.
pub const ID_DOMAIN: &str = "vctcal";

/// Default length of a calendar block for one match.
pub const DEFAULT_MATCH_DURATION_HOURS: i64 = 2;

/// Shown wherever a team slot has not been decided yet.
pub const PLACEHOLDER_TEAM: &str = "TBD";

/// Prefix for the custom properties that carry match facets in .ics files.
pub const X_PREFIX: &str = "X-VCTCAL-";
