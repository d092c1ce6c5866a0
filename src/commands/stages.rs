use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use vctcal_core::detect::{detect_stages, detect_upcoming};
use vctcal_core::ics::load_document;
use vctcal_core::{CalendarDocument, VctConfig};

use crate::render::pluralize;

pub fn run(config: &VctConfig, input: Option<PathBuf>) -> Result<()> {
    let season = config.to_season()?;
    let input = input.unwrap_or_else(|| config.calendar_path());

    let document = if input.exists() {
        load_document(&input, &season)?
    } else {
        println!("{}", format!("{} does not exist yet", input.display()).dimmed());
        CalendarDocument::new()
    };

    let now = Utc::now();
    let detected = detect_stages(&document);
    let upcoming = detect_upcoming(&document, now);

    println!("📅 {}", input.display());

    for stage in season.registry.stages() {
        let events = document.iter().filter(|e| e.key.stage == stage).count();
        let name = season.registry.display_name(&stage);
        let active = season.registry.def(&stage).is_some_and(|d| d.active);

        let state = if upcoming.contains(&stage) {
            format!("{} {}, upcoming", events, pluralize("event", events))
                .green()
                .to_string()
        } else if detected.contains(&stage) {
            format!("{} {}, finished", events, pluralize("event", events))
                .dimmed()
                .to_string()
        } else {
            "not in calendar".dimmed().to_string()
        };

        let marker = if active { "*".yellow().to_string() } else { " ".to_string() };
        println!("   {} {:<10} {:<28} {}", marker, stage.token(), name, state);
    }

    Ok(())
}
