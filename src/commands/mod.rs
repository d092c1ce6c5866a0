pub mod generate;
pub mod stages;
pub mod update;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;
use vctcal_core::sync::Orchestrator;
use vctcal_core::{MergeEngine, Season, VctConfig};
use vctcal_source_vlr::{VlrOptions, VlrSource};

/// Orchestrator over vlr.gg for the configured season.
fn vlr_orchestrator(config: &VctConfig, season: Season) -> Result<Orchestrator> {
    let options = VlrOptions::from_config(config)?;
    debug!(base_url = %options.base_url, concurrency = config.fetch_concurrency, "using vlr.gg source");
    let source = VlrSource::new(options)?;
    Ok(Orchestrator::new(
        MergeEngine::new(season),
        Arc::new(source),
        config.fetch_concurrency,
    ))
}
