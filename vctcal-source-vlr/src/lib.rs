//! vctcal-source-vlr - vlr.gg match source for vctcal
//!
//! A stage is fetched in two steps: the stage overview lists one tournament
//! per region, then each tournament page lists its match cards.

mod bracket;
mod client;
mod convert;
mod datetime;
mod error;
mod listing;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono_tz::Tz;
use tracing::{debug, info, warn};
use vctcal_core::model::{Match, Region, Stage, StageDef};
use vctcal_core::{MatchSource, VctConfig, VctError, VctResult};

pub use client::BackoffPolicy;
pub use error::{SourceError, SourceResult};

use crate::client::HttpClient;
use crate::convert::{CardContext, cards_to_matches};

#[derive(Debug, Clone)]
pub struct VlrOptions {
    pub base_url: String,
    pub season_year: i32,
    /// Zone the site prints match times in.
    pub timezone: Tz,
    pub excluded_regions: Vec<Region>,
    pub request_delay: Duration,
    pub timeout: Duration,
    pub backoff: BackoffPolicy,
}

impl VlrOptions {
    pub fn from_config(config: &VctConfig) -> VctResult<Self> {
        Ok(VlrOptions {
            base_url: config.base_url.clone(),
            season_year: config.season_year,
            timezone: config.source_timezone()?,
            excluded_regions: config
                .excluded_regions
                .iter()
                .map(|r| Region::new(r))
                .collect(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            timeout: Duration::from_secs(config.request_timeout_secs),
            backoff: BackoffPolicy::default(),
        })
    }
}

pub struct VlrSource {
    client: HttpClient,
    options: VlrOptions,
}

impl VlrSource {
    pub fn new(options: VlrOptions) -> VctResult<Self> {
        let client = HttpClient::new(options.timeout, options.request_delay, options.backoff)
            .map_err(|e| VctError::Config(format!("Could not build HTTP client: {e}")))?;
        Ok(VlrSource { client, options })
    }

    async fn stage_matches(&self, stage: &Stage, def: &StageDef) -> SourceResult<Vec<Match>> {
        let vlr_id = def
            .vlr_id
            .ok_or_else(|| SourceError::MissingStageId(stage.to_string()))?;

        let overview_url = listing::stage_listing_url(&self.options.base_url, vlr_id);
        let overview = self.client.get_text(&overview_url).await?;
        let tournaments = listing::parse_tournaments(&overview, &self.options.base_url)?;
        info!(stage = %stage, count = tournaments.len(), "found tournaments");

        let mut matches = Vec::new();
        let mut seen_regions = HashSet::new();
        for mut tournament in tournaments {
            if self.options.excluded_regions.contains(&tournament.region) {
                debug!(tournament = %tournament.name, "region excluded");
                continue;
            }

            // Two brackets sharing a region would share ids; the second one
            // is keyed by its full name instead
            if !seen_regions.insert(tournament.region.clone()) {
                warn!(tournament = %tournament.name, region = %tournament.region, "region already used in this stage");
                tournament.region = Region::new(&tournament.name);
            }

            let page = self.client.get_text(&tournament.url).await?;
            let cards = bracket::parse_match_cards(&page)?;
            let ctx = CardContext {
                stage,
                region: &tournament.region,
                base_url: &self.options.base_url,
                season_year: self.options.season_year,
                timezone: self.options.timezone,
            };
            let found = cards_to_matches(&cards, &ctx);
            info!(tournament = %tournament.name, count = found.len(), "found matches");
            matches.extend(found);
        }

        Ok(matches)
    }
}

#[async_trait]
impl MatchSource for VlrSource {
    async fn fetch_stage(&self, stage: &Stage, def: &StageDef) -> VctResult<Vec<Match>> {
        self.stage_matches(stage, def)
            .await
            .map_err(|e| VctError::retrieval(stage, e))
    }
}
