//! Stable event identifiers derived from a match's bracket position.
//!
//! An id is built from `(stage, region, sequence)` only. Team names, times and
//! results are free to change without the event losing its identity:
//!
//! ```text
//! kickoff.americas.ur1.2@vctcal
//! ^stage  ^region  ^round ^slot
//! ```
//!
//! None of the tokens can contain `.`, so every id decomposes back into the
//! triple it came from.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use serde::Serialize;

use crate::constants::ID_DOMAIN;
use crate::error::{VctError, VctResult};
use crate::model::{Region, Sequence, Stage, StageRegistry};

/// The identity-bearing triple of a match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MatchKey {
    pub stage: Stage,
    pub region: Region,
    pub sequence: Sequence,
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.stage, self.region, self.sequence)
    }
}

/// Event UID as written to the calendar.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wrap a UID read from a file. Whether it is well-formed is checked by
    /// [`IdentityScheme::decompose`].
    pub fn from_uid(uid: &str) -> Self {
        EventId(uid.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct IdentityScheme {
    registry: StageRegistry,
}

impl IdentityScheme {
    pub fn new(registry: StageRegistry) -> Self {
        IdentityScheme { registry }
    }

    pub fn identify(&self, key: &MatchKey) -> EventId {
        EventId(format!(
            "{}.{}.{}@{}",
            key.stage.token(),
            key.region.token(),
            key.sequence,
            ID_DOMAIN
        ))
    }

    /// Recover the triple an id was derived from.
    pub fn decompose(&self, id: &EventId) -> VctResult<MatchKey> {
        let not_ours =
            |why: &str| VctError::CorruptDocument(format!("'{id}' is not a match id: {why}"));

        let local = id
            .as_str()
            .strip_suffix(&format!("@{ID_DOMAIN}"))
            .ok_or_else(|| not_ours("wrong domain"))?;

        let mut parts = local.splitn(3, '.');
        let (Some(stage), Some(region), Some(sequence)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(not_ours("expected stage.region.round.slot"));
        };

        let stage = self
            .registry
            .resolve(stage)
            .map_err(|e| not_ours(&e.to_string()))?;

        let region_token = Region::new(region);
        if region_token.token() != region {
            return Err(not_ours("region is not normalized"));
        }

        let sequence = sequence.parse::<Sequence>().map_err(|e| not_ours(&e))?;

        Ok(MatchKey {
            stage,
            region: region_token,
            sequence,
        })
    }

    /// Check that an event carrying `key` may legitimately live under `id`.
    pub fn verify(&self, id: &EventId, key: &MatchKey) -> VctResult<()> {
        let derived = self.identify(key);
        if &derived == id {
            Ok(())
        } else {
            Err(VctError::IdentityConflict {
                id: id.to_string(),
                detail: format!("event claims {key}, which derives {derived}"),
            })
        }
    }
}

/// Outcome of claiming an id within one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    First,
    /// Same triple seen earlier in the batch.
    Repeat,
}

/// Ids handed out while processing one batch, so that two different
/// triples can never end up sharing an event.
#[derive(Debug, Default)]
pub struct IdLedger {
    claimed: HashMap<EventId, MatchKey>,
}

impl IdLedger {
    pub fn claim(&mut self, id: &EventId, key: &MatchKey) -> VctResult<Claim> {
        match self.claimed.entry(id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(key.clone());
                Ok(Claim::First)
            }
            Entry::Occupied(existing) if existing.get() == key => Ok(Claim::Repeat),
            Entry::Occupied(existing) => Err(VctError::IdentityConflict {
                id: id.to_string(),
                detail: format!("derived from both {} and {key}", existing.get()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Round;

    fn scheme() -> IdentityScheme {
        IdentityScheme::new(StageRegistry::default())
    }

    fn key(stage: &str, region: &str, sequence: Sequence) -> MatchKey {
        MatchKey {
            stage: StageRegistry::default().resolve(stage).unwrap(),
            region: Region::new(region),
            sequence,
        }
    }

    #[test]
    fn id_format() {
        let id = scheme().identify(&key("kickoff", "Americas", Sequence::new(Round::Upper(1), 2)));
        assert_eq!(id.as_str(), "kickoff.americas.ur1.2@vctcal");
    }

    #[test]
    fn decompose_inverts_identify() {
        let scheme = scheme();
        let original = key("masters", "", Sequence::new(Round::GrandFinal, 1));
        let id = scheme.identify(&original);
        assert_eq!(id.as_str(), "masters.international.gf.1@vctcal");
        assert_eq!(scheme.decompose(&id).unwrap(), original);
    }

    #[test]
    fn decompose_handles_dashed_regions() {
        let scheme = scheme();
        let original = key("stage1", "North America", Sequence::numbered(12));
        let id = scheme.identify(&original);
        assert_eq!(scheme.decompose(&id).unwrap(), original);
    }

    #[test]
    fn decompose_rejects_foreign_ids() {
        let scheme = scheme();
        for uid in [
            "match-123456@vlr.gg",
            "kickoff.americas@vctcal",
            "playoffs.americas.ur1.1@vctcal",
            "kickoff.Americas.ur1.1@vctcal",
            "kickoff.americas.zz1.1@vctcal",
        ] {
            let err = scheme.decompose(&EventId::from_uid(uid)).unwrap_err();
            assert!(matches!(err, VctError::CorruptDocument(_)), "{uid}: {err:?}");
        }
    }

    #[test]
    fn verify_flags_mismatched_facets() {
        let scheme = scheme();
        let kickoff = key("kickoff", "emea", Sequence::numbered(1));
        let masters = key("masters", "emea", Sequence::numbered(1));
        let id = scheme.identify(&kickoff);

        assert!(scheme.verify(&id, &kickoff).is_ok());
        assert!(matches!(
            scheme.verify(&id, &masters),
            Err(VctError::IdentityConflict { .. })
        ));
    }

    #[test]
    fn ledger_distinguishes_repeats_from_conflicts() {
        let mut ledger = IdLedger::default();
        let a = key("kickoff", "pacific", Sequence::numbered(1));
        let b = key("kickoff", "pacific", Sequence::numbered(2));
        let id = EventId::from_uid("shared@vctcal");

        assert_eq!(ledger.claim(&id, &a).unwrap(), Claim::First);
        assert_eq!(ledger.claim(&id, &a).unwrap(), Claim::Repeat);
        assert!(matches!(
            ledger.claim(&id, &b),
            Err(VctError::IdentityConflict { .. })
        ));
    }
}
