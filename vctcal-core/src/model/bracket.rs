//! Bracket positions: which round a match belongs to and its slot in that round.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A bracket round, identified by the short code vlr.gg uses in match URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Round {
    Upper(u8),
    UpperFinal,
    Middle(u8),
    MiddleFinal,
    Lower(u8),
    LowerFinal,
    GrandFinal,
    /// Matches listed without a recognizable round (group stages, fallbacks).
    Unlabelled,
}

impl Round {
    pub fn code(&self) -> String {
        match self {
            Round::Upper(n) => format!("ur{n}"),
            Round::UpperFinal => "ubf".to_string(),
            Round::Middle(n) => format!("mr{n}"),
            Round::MiddleFinal => "mbf".to_string(),
            Round::Lower(n) => format!("lr{n}"),
            Round::LowerFinal => "lbf".to_string(),
            Round::GrandFinal => "gf".to_string(),
            Round::Unlabelled => "m".to_string(),
        }
    }

    /// Label used in titles unless the stage overrides it.
    pub fn default_label(&self) -> String {
        match self {
            Round::Upper(n) => format!("Upper Round {n}"),
            Round::UpperFinal => "Upper Final".to_string(),
            Round::Middle(n) => format!("Middle Round {n}"),
            Round::MiddleFinal => "Middle Final".to_string(),
            Round::Lower(n) => format!("Lower Round {n}"),
            Round::LowerFinal => "Lower Final".to_string(),
            Round::GrandFinal => "Grand Final".to_string(),
            Round::Unlabelled => "Match".to_string(),
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Round {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();

        let round = match code.as_str() {
            "ubf" => Round::UpperFinal,
            "mbf" => Round::MiddleFinal,
            "lbf" => Round::LowerFinal,
            "gf" => Round::GrandFinal,
            "m" => Round::Unlabelled,
            _ => {
                let (ctor, number): (fn(u8) -> Round, &str) =
                    if let Some(n) = code.strip_prefix("ur") {
                        (Round::Upper, n)
                    } else if let Some(n) = code.strip_prefix("mr") {
                        (Round::Middle, n)
                    } else if let Some(n) = code.strip_prefix("lr") {
                        (Round::Lower, n)
                    } else {
                        return Err(format!("unknown round code '{s}'"));
                    };

                match number.parse::<u8>() {
                    Ok(n) if n > 0 => ctor(n),
                    _ => return Err(format!("unknown round code '{s}'")),
                }
            }
        };

        Ok(round)
    }
}

/// Stable position of a match inside a stage+region bracket.
///
/// Known before either team is, and unchanged when teams, times or results move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub round: Round,
    /// 1-based slot within the round, or the source match id for unlabelled rounds.
    pub slot: u32,
}

impl Sequence {
    pub fn new(round: Round, slot: u32) -> Self {
        Sequence { round, slot }
    }

    /// A plain running number with no bracket round attached.
    pub fn numbered(slot: u32) -> Self {
        Sequence::new(Round::Unlabelled, slot)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.round, self.slot)
    }
}

impl FromStr for Sequence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (round, slot) = s
            .split_once('.')
            .ok_or_else(|| format!("invalid sequence '{s}'"))?;
        let round = round.parse()?;
        let slot = slot
            .parse::<u32>()
            .map_err(|_| format!("invalid slot in sequence '{s}'"))?;
        Ok(Sequence { round, slot })
    }
}
