//! Match cards on a tournament page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use vctcal_core::model::Round;

use crate::error::SourceResult;
use crate::listing::parse_selector;

/// `/612345/...`: the numeric match id vlr.gg puts first in match URLs.
static MATCH_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(\d{5,7})/").expect("valid regex"));

/// Round code at the end of a match slug (`...-ur1`, `...-lbf`, `...-gf`).
static ROUND_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-((?:ur|mr|lr)\d+|ubf|mbf|lbf|gf)$").expect("valid regex")
});

static TIME_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[\d:\s]+[ap]m$").expect("valid regex"));

static MONTH_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\b").expect("valid regex")
});

static ROUND_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Round|Upper|Lower|Middle|Grand|Final|Bo\d+)$").expect("valid regex")
});

/// One match as printed on the page, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCard {
    pub vlr_id: String,
    pub href: String,
    pub round: Round,
    pub team_a: String,
    pub team_b: String,
    pub score: Option<(u8, u8)>,
    pub live: bool,
    /// All visible text of the card, whitespace-joined.
    pub text: String,
}

/// Match cards in page order, one per vlr match id.
///
/// Links whose slug ends in a round code are preferred. When a page has none,
/// every match link is taken and the round is left unlabelled.
pub fn parse_match_cards(html: &str) -> SourceResult<Vec<MatchCard>> {
    let document = Html::parse_document(html);
    let anchors = parse_selector("a[href]")?;

    let match_links: Vec<(ElementRef, &str, &str)> = document
        .select(&anchors)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let id = MATCH_PATH.captures(href)?.get(1)?.as_str();
            Some((a, href, id))
        })
        .collect();

    let coded: Vec<_> = match_links
        .iter()
        .filter_map(|(a, href, id)| round_from_href(href).map(|round| (*a, *href, *id, round)))
        .collect();

    let candidates = if coded.is_empty() {
        match_links
            .into_iter()
            .map(|(a, href, id)| (a, href, id, Round::Unlabelled))
            .collect()
    } else {
        coded
    };

    let mut cards: Vec<MatchCard> = Vec::new();
    for (link, href, id, round) in candidates {
        if cards.iter().any(|c| c.vlr_id == id) {
            continue;
        }
        cards.push(read_card(link, href, id, round)?);
    }

    Ok(cards)
}

fn round_from_href(href: &str) -> Option<Round> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let code = ROUND_SUFFIX.captures(path)?.get(1)?.as_str();
    code.parse().ok()
}

fn read_card(link: ElementRef, href: &str, id: &str, round: Round) -> SourceResult<MatchCard> {
    let (team_a, team_b, score) = read_teams(link)?;

    let live_marker = parse_selector(".mod-live, .ml-status-live")?;
    let live = link.select(&live_marker).next().is_some()
        || link.text().any(|t| t.trim().eq_ignore_ascii_case("live"));

    Ok(MatchCard {
        vlr_id: id.to_string(),
        href: href.to_string(),
        round,
        team_a,
        team_b,
        score,
        live,
        text: link.text().collect::<Vec<_>>().join(" "),
    })
}

fn texts(link: ElementRef, selector: &str) -> SourceResult<Vec<String>> {
    let sel = parse_selector(selector)?;
    Ok(link
        .select(&sel)
        .map(|n| n.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

type Teams = (String, String, Option<(u8, u8)>);

fn read_teams(link: ElementRef) -> SourceResult<Teams> {
    // Bracket card
    let names = texts(link, ".team-name div")?;
    if names.len() >= 2 {
        let left = texts(link, ".score-left")?;
        let right = texts(link, ".score-right")?;
        let score = match (left.first(), right.first()) {
            (Some(l), Some(r)) => l.parse::<u8>().ok().zip(r.parse::<u8>().ok()),
            _ => None,
        };
        return Ok((names[0].clone(), names[1].clone(), score));
    }

    // Sidebar list
    let names = texts(link, ".event-sidebar-matches-team .name span")?;
    if names.len() >= 2 {
        return Ok((names[0].clone(), names[1].clone(), None));
    }

    // Anything else: plain text pieces that are not times, dates or round words
    let candidates: Vec<&str> = link
        .text()
        .map(str::trim)
        .filter(|part| {
            part.chars().count() > 1
                && !part.chars().all(|c| c.is_ascii_digit())
                && !TIME_PART.is_match(part)
                && !MONTH_PART.is_match(part)
                && !ROUND_WORD.is_match(part)
                && !part.eq_ignore_ascii_case("WIB")
                && !part.eq_ignore_ascii_case("live")
        })
        .collect();

    let team = |i: usize| candidates.get(i).map(|s| s.to_string()).unwrap_or_default();
    Ok((team(0), team(1), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRACKET: &str = r#"
<html><body><div class="event-brackets-container">
  <div class="bracket-col">
    <div class="bracket-col-label">Upper Round 1</div>
    <a class="bracket-item mod-link" href="/600101/sentinels-vs-cloud9-vct-2026-americas-kickoff-ur1">
      <div class="bracket-item-team">
        <div class="team-name"><div>Sentinels</div></div><span class="score-left">2</span>
      </div>
      <div class="bracket-item-team">
        <div class="team-name"><div>Cloud9</div></div><span class="score-right">1</span>
      </div>
      <div class="bracket-item-status">Jan 15 4:00 pm</div>
    </a>
    <a class="bracket-item mod-link" href="/600102/tbd-vs-tbd-vct-2026-americas-kickoff-ur1">
      <div class="bracket-item-team"><div class="team-name"><div>TBD</div></div><span class="score-left">–</span></div>
      <div class="bracket-item-team"><div class="team-name"><div>TBD</div></div><span class="score-right">–</span></div>
      <div class="bracket-item-status">Jan 16 1:00 am</div>
    </a>
  </div>
  <div class="bracket-col">
    <a class="bracket-item mod-link" href="/600103/g2-vs-leviatan-vct-2026-americas-kickoff-ubf?tab=overview">
      <div class="bracket-item-team"><div class="team-name"><div>G2 Esports</div></div><span class="score-left">1</span></div>
      <div class="bracket-item-team"><div class="team-name"><div>LEVIATÁN</div></div><span class="score-right">0</span></div>
      <span class="mod-live">LIVE</span>
    </a>
    <a class="bracket-item mod-link" href="/600101/sentinels-vs-cloud9-vct-2026-americas-kickoff-ur1">duplicate</a>
  </div>
  <a href="/600199/some-showmatch">Showmatch</a>
</div></body></html>
"#;

    #[test]
    fn test_round_coded_cards() {
        let cards = parse_match_cards(BRACKET).unwrap();

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].vlr_id, "600101");
        assert_eq!(cards[0].round, Round::Upper(1));
        assert_eq!(cards[0].team_a, "Sentinels");
        assert_eq!(cards[0].team_b, "Cloud9");
        assert_eq!(cards[0].score, Some((2, 1)));
        assert!(!cards[0].live);

        assert_eq!(cards[1].round, Round::Upper(1));
        assert_eq!(cards[1].team_a, "TBD");
        assert_eq!(cards[1].score, None);

        assert_eq!(cards[2].round, Round::UpperFinal);
        assert_eq!(cards[2].team_b, "LEVIATÁN");
        assert!(cards[2].live);
    }

    #[test]
    fn test_fallback_takes_any_match_link() {
        let html = r#"
<div class="event-sidebar-matches">
  <a href="/612001/team-a-vs-team-b-group-stage">
    <div class="event-sidebar-matches-team"><div class="name"><span>Team Heretics</span></div></div>
    <div class="event-sidebar-matches-team"><div class="name"><span>FNATIC</span></div></div>
    <div>11:00 pm WIB, Jan 20</div>
  </a>
  <a href="/612002/x-vs-y">
    <div>Paper Rex</div><div>7:00 pm</div><div>Round</div>
  </a>
  <a href="/news/123">news</a>
</div>"#;
        let cards = parse_match_cards(html).unwrap();

        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.round == Round::Unlabelled));
        assert_eq!(cards[0].team_a, "Team Heretics");
        assert_eq!(cards[0].team_b, "FNATIC");
        assert!(cards[0].text.contains("11:00 pm WIB, Jan 20"));
        assert_eq!(cards[1].team_a, "Paper Rex");
        assert_eq!(cards[1].team_b, "");
    }
}
