//! The stage overview page: which tournaments (regional brackets) a stage has.

use scraper::{Html, Selector};
use vctcal_core::model::Region;

use crate::error::{SourceError, SourceResult};

const KNOWN_REGIONS: [&str; 4] = ["Americas", "EMEA", "Pacific", "China"];

#[derive(Debug, Clone, PartialEq)]
pub struct Tournament {
    pub event_id: String,
    pub name: String,
    pub region: Region,
    pub url: String,
}

pub fn stage_listing_url(base_url: &str, vlr_id: u32) -> String {
    format!("{}/vct/?region=all&stage={vlr_id}", base_url.trim_end_matches('/'))
}

pub(crate) fn parse_selector(selector: &str) -> SourceResult<Selector> {
    Selector::parse(selector).map_err(|e| SourceError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Tournaments linked from a stage overview, in page order, one per event id.
pub fn parse_tournaments(html: &str, base_url: &str) -> SourceResult<Vec<Tournament>> {
    let document = Html::parse_document(html);
    let links = parse_selector(r#"a[href^="/event/"]"#)?;
    let mut tournaments: Vec<Tournament> = Vec::new();

    for link in document.select(&links) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        // /event/<id>/<slug>/...
        let mut parts = href.split('/').skip(2);
        let (Some(event_id), Some(slug)) = (parts.next(), parts.next()) else {
            continue;
        };
        if event_id.is_empty() || tournaments.iter().any(|t| t.event_id == event_id) {
            continue;
        }

        let name = tournament_name(slug);
        if name.is_empty() {
            continue;
        }

        tournaments.push(Tournament {
            event_id: event_id.to_string(),
            region: detect_region(&name),
            name,
            url: format!("{}{href}", base_url.trim_end_matches('/')),
        });
    }

    Ok(tournaments)
}

/// `vct-2026-americas-kickoff` -> `VCT 2026 Americas Kickoff`
fn tournament_name(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| match word {
            "vct" => "VCT".to_string(),
            "emea" => "EMEA".to_string(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn detect_region(name: &str) -> Region {
    let lower = name.to_lowercase();
    KNOWN_REGIONS
        .iter()
        .find(|r| lower.contains(&r.to_lowercase()))
        .map(|r| Region::new(r))
        .unwrap_or_else(Region::international)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERVIEW: &str = r#"
<html><body>
  <div class="events-container">
    <a class="wf-card event-item" href="/event/2682/vct-2026-americas-kickoff">
      <div class="event-item-title">VCT 2026: Americas Kickoff</div>
      <div class="event-item-desc-item-value">Jan 15—Feb 8</div>
    </a>
    <a class="wf-card event-item" href="/event/2683/vct-2026-emea-kickoff">EMEA</a>
    <a class="wf-card event-item" href="/event/2682/vct-2026-americas-kickoff/matches">dup</a>
    <a class="wf-card event-item" href="/event/2700/champions-tour-2026-masters-santiago">Masters</a>
    <a href="/event/">broken</a>
  </div>
</body></html>
"#;

    #[test]
    fn test_parse_tournaments() {
        let tournaments = parse_tournaments(OVERVIEW, "https://www.vlr.gg").unwrap();

        assert_eq!(tournaments.len(), 3);
        assert_eq!(tournaments[0].event_id, "2682");
        assert_eq!(tournaments[0].name, "VCT 2026 Americas Kickoff");
        assert_eq!(tournaments[0].region, Region::new("americas"));
        assert_eq!(
            tournaments[0].url,
            "https://www.vlr.gg/event/2682/vct-2026-americas-kickoff"
        );
        assert_eq!(tournaments[1].region, Region::new("emea"));
        assert_eq!(tournaments[2].region, Region::international());
    }

    #[test]
    fn test_stage_listing_url() {
        assert_eq!(
            stage_listing_url("https://www.vlr.gg/", 45),
            "https://www.vlr.gg/vct/?region=all&stage=45"
        );
    }
}
