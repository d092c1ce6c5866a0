use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use owo_colors::OwoColorize;
use vctcal_core::detect::{detect_stages, detect_upcoming};
use vctcal_core::ics::{load_document, save_document};
use vctcal_core::model::Stage;
use vctcal_core::{MergeMode, VctConfig};

use crate::render::{StageRender, pluralize, render_counts};
use crate::utils::tui;

pub struct UpdateArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub stages: Vec<String>,
    pub upcoming: bool,
    pub verbose: bool,
}

pub async fn run(config: &VctConfig, args: UpdateArgs) -> Result<()> {
    let season = config.to_season()?;
    let registry = season.registry.clone();

    let input = args.input.unwrap_or_else(|| config.calendar_path());
    if !input.exists() {
        bail!(
            "Calendar {} not found.\n\nCreate it first with:\n  vctcal generate --stage <stage>",
            input.display()
        );
    }
    let output = args.output.unwrap_or_else(|| input.clone());

    let document = load_document(&input, &season)?;
    let now = Utc::now();

    let detected: BTreeSet<Stage> = if args.upcoming {
        detect_upcoming(&document, now)
    } else {
        detect_stages(&document)
    };

    if args.stages.is_empty() && detected.is_empty() {
        let what = if args.upcoming { "upcoming matches" } else { "stages" };
        println!("{}", format!("No {what} in {}, nothing to update", input.display()).dimmed());
        return Ok(());
    }

    let names: Vec<String> = if args.stages.is_empty() {
        detected.iter().map(|s| registry.display_name(s)).collect()
    } else {
        args.stages.clone()
    };

    let orchestrator = super::vlr_orchestrator(config, season)?;

    let spinner = tui::create_spinner(tui::fetch_message(&names));
    let result = if args.stages.is_empty() {
        orchestrator
            .run_stages(&document, &detected, MergeMode::Update, now)
            .await
    } else {
        orchestrator
            .run(&document, &args.stages, MergeMode::Update, now)
            .await
    };
    spinner.finish_and_clear();
    let (calendar, summary) = result?;

    println!("{}", summary.render(&registry, args.verbose));

    if summary.stages.len() > 1 {
        println!("\n{} {}", "Total:".bold(), render_counts(&summary.totals()));
    }

    if summary.has_changes() || output != input {
        save_document(&output, &calendar, orchestrator.engine().season())?;
        let updated = summary.totals().updated;
        println!(
            "\nUpdated {} {} in {}",
            updated,
            pluralize("event", updated),
            output.display()
        );
    }

    if !summary.is_success() {
        bail!(
            "{} {} failed",
            summary.failures.len(),
            pluralize("stage", summary.failures.len())
        );
    }

    Ok(())
}
