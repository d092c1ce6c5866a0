//! Match lifecycle state and results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of a match. Ordered: a match only ever moves forward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
}

/// What applying a freshly fetched status to a stored one amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    Advanced(MatchStatus),
    Unchanged,
    /// The fetched status is behind the stored one (stale or out-of-order page).
    Regression,
}

impl MatchStatus {
    pub fn token(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "Scheduled",
            MatchStatus::Live => "Live",
            MatchStatus::Completed => "Completed",
        }
    }

    /// RFC 5545 STATUS value.
    pub fn ics_status(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "TENTATIVE",
            MatchStatus::Live | MatchStatus::Completed => "CONFIRMED",
        }
    }

    pub fn transition_to(self, incoming: MatchStatus) -> StatusTransition {
        match incoming.cmp(&self) {
            std::cmp::Ordering::Greater => StatusTransition::Advanced(incoming),
            std::cmp::Ordering::Equal => StatusTransition::Unchanged,
            std::cmp::Ordering::Less => StatusTransition::Regression,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "live" => Ok(MatchStatus::Live),
            "completed" => Ok(MatchStatus::Completed),
            other => Err(format!("unknown match status '{other}'")),
        }
    }
}

/// Maps won by each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub a: u8,
    pub b: u8,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

impl FromStr for Score {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("invalid score '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid score '{s}'"))
        };
        Ok(Score {
            a: parse(a)?,
            b: parse(b)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_moves_forward() {
        use MatchStatus::*;
        assert_eq!(
            Scheduled.transition_to(Live),
            StatusTransition::Advanced(Live)
        );
        assert_eq!(
            Scheduled.transition_to(Completed),
            StatusTransition::Advanced(Completed)
        );
        assert_eq!(Live.transition_to(Live), StatusTransition::Unchanged);
        assert_eq!(
            Completed.transition_to(Scheduled),
            StatusTransition::Regression
        );
        assert_eq!(Completed.transition_to(Live), StatusTransition::Regression);
    }

    #[test]
    fn status_tokens_parse_back() {
        for status in [
            MatchStatus::Scheduled,
            MatchStatus::Live,
            MatchStatus::Completed,
        ] {
            assert_eq!(status.token().parse::<MatchStatus>(), Ok(status));
        }
    }

    #[test]
    fn score_text_form() {
        let score: Score = "2-1".parse().unwrap();
        assert_eq!(score, Score { a: 2, b: 1 });
        assert_eq!(score.to_string(), "2-1");
        assert!("2:1".parse::<Score>().is_err());
    }
}
