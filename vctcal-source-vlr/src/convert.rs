//! Match cards to core `Match` values.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use vctcal_core::model::{Match, MatchStatus, Region, Round, Score, Sequence, Stage, Team};

use crate::bracket::MatchCard;
use crate::datetime::card_start_time;

/// What a card cannot tell on its own.
pub struct CardContext<'a> {
    pub stage: &'a Stage,
    pub region: &'a Region,
    pub base_url: &'a str,
    pub season_year: i32,
    pub timezone: Tz,
}

/// Convert the cards of one tournament page.
///
/// In a round-coded bracket, slots count cards of the same round in page
/// order, so a match keeps its slot while its teams and time are still
/// unknown. Unlabelled cards come from chronological lists that reorder when
/// a match moves; their slot is the vlr match id instead.
pub fn cards_to_matches(cards: &[MatchCard], ctx: &CardContext) -> Vec<Match> {
    let mut next_slot: BTreeMap<Round, u32> = BTreeMap::new();

    cards
        .iter()
        .map(|card| {
            let match_id = match card.round {
                Round::Unlabelled => card.vlr_id.parse::<u32>().ok(),
                _ => None,
            };
            let slot = match match_id {
                Some(id) => id,
                None => {
                    let slot = next_slot.entry(card.round).or_insert(0);
                    *slot += 1;
                    *slot
                }
            };
            to_match(card, slot, ctx)
        })
        .collect()
}

fn to_match(card: &MatchCard, slot: u32, ctx: &CardContext) -> Match {
    let score = card.score.map(|(a, b)| Score { a, b });

    let status = if card.live {
        MatchStatus::Live
    } else if score.is_some() {
        MatchStatus::Completed
    } else {
        MatchStatus::Scheduled
    };

    Match {
        stage: ctx.stage.clone(),
        region: ctx.region.clone(),
        sequence: Sequence::new(card.round, slot),
        team_a: Team::from_source(&card.team_a),
        team_b: Team::from_source(&card.team_b),
        scheduled_time: card_start_time(&card.text, ctx.season_year, ctx.timezone),
        status,
        score,
        source_reference: format!("{}{}", ctx.base_url.trim_end_matches('/'), card.href),
    }
}
