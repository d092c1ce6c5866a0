use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::PLACEHOLDER_TEAM;

/// One side of a match. A slot can be known before its occupant is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Unresolved,
    Resolved(String),
}

impl Team {
    /// Interpret a name as scraped. Blank names and "TBD" are placeholders.
    pub fn from_source(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(PLACEHOLDER_TEAM) {
            Team::Unresolved
        } else {
            Team::Resolved(name.to_string())
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Team::Resolved(name) => Some(name),
            Team::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Team::Resolved(_))
    }

    /// The value an update should store, or `None` when this slot stays as is.
    ///
    /// A placeholder never replaces a known team: the source only goes back
    /// to "TBD" on stale pages.
    pub fn superseded_by(&self, incoming: &Team) -> Option<Team> {
        match (self, incoming) {
            (_, Team::Unresolved) => None,
            (Team::Unresolved, Team::Resolved(_)) => Some(incoming.clone()),
            (Team::Resolved(current), Team::Resolved(new)) if current != new => {
                Some(incoming.clone())
            }
            (Team::Resolved(_), Team::Resolved(_)) => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Resolved(name) => write!(f, "{name}"),
            Team::Unresolved => write!(f, "{PLACEHOLDER_TEAM}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_spellings() {
        assert_eq!(Team::from_source("TBD"), Team::Unresolved);
        assert_eq!(Team::from_source(" tbd "), Team::Unresolved);
        assert_eq!(Team::from_source(""), Team::Unresolved);
        assert_eq!(
            Team::from_source(" Sentinels "),
            Team::Resolved("Sentinels".into())
        );
    }

    #[test]
    fn two_placeholders_are_not_a_change() {
        assert_eq!(Team::Unresolved.superseded_by(&Team::Unresolved), None);
    }

    #[test]
    fn placeholder_to_real_is_a_change() {
        let real = Team::Resolved("LOUD".into());
        assert_eq!(Team::Unresolved.superseded_by(&real), Some(real));
    }

    #[test]
    fn corrections_apply_but_placeholders_never_erase() {
        let old = Team::Resolved("G2".into());
        let new = Team::Resolved("G2 Esports".into());
        assert_eq!(old.superseded_by(&new), Some(new.clone()));
        assert_eq!(new.superseded_by(&new.clone()), None);
        assert_eq!(new.superseded_by(&Team::Unresolved), None);
    }

    #[test]
    fn placeholder_displays_as_tbd() {
        assert_eq!(Team::Unresolved.to_string(), "TBD");
    }
}
