use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use owo_colors::OwoColorize;
use vctcal_core::ics::{load_document, save_document};
use vctcal_core::{CalendarDocument, MergeMode, VctConfig};

use crate::render::{StageRender, pluralize};
use crate::utils::tui;

pub struct GenerateArgs {
    pub stage: Option<String>,
    pub output: Option<PathBuf>,
    pub append: bool,
    pub save_stage: bool,
    pub verbose: bool,
}

pub async fn run(config: &VctConfig, args: GenerateArgs) -> Result<()> {
    let season = config.to_season()?;
    let registry = season.registry.clone();

    let stage = match &args.stage {
        Some(token) => registry.resolve(token)?,
        None => registry.active_stage().ok_or_else(|| {
            let known = registry.tokens().collect::<Vec<_>>().join(", ");
            anyhow!("No active stage in the config.\n\nPick one with --stage <{known}>")
        })?,
    };
    let output = args.output.unwrap_or_else(|| config.calendar_path());

    let (document, mode) = if args.append && output.exists() {
        (load_document(&output, &season)?, MergeMode::GenerateAppend)
    } else {
        if args.append {
            println!(
                "{}",
                format!("{} does not exist yet, generating it", output.display()).dimmed()
            );
        }
        (CalendarDocument::new(), MergeMode::Generate)
    };

    let orchestrator = super::vlr_orchestrator(config, season)?;
    let now = Utc::now();

    let spinner = tui::create_spinner(tui::fetch_message(&[registry.display_name(&stage)]));
    let fetched = orchestrator.fetch(&BTreeSet::from([stage.clone()])).await;
    spinner.finish_and_clear();
    let fetched = fetched?;

    let (calendar, mut summary) = orchestrator.apply(&document, &fetched.batches, mode, now)?;
    summary.failures.extend(fetched.failures);

    println!("{}", summary.render(&registry, args.verbose));

    if !summary.is_success() {
        bail!("Could not fetch {}, nothing was written", registry.display_name(&stage));
    }

    save_document(&output, &calendar, orchestrator.engine().season())?;
    println!(
        "\nWrote {} {} to {}",
        calendar.len(),
        pluralize("event", calendar.len()),
        output.display()
    );

    if args.save_stage {
        let (stage_calendar, _) = orchestrator.apply(
            &CalendarDocument::new(),
            &fetched.batches,
            MergeMode::Generate,
            now,
        )?;
        let stage_path = config.stage_path(&stage);
        save_document(&stage_path, &stage_calendar, orchestrator.engine().season())?;
        println!(
            "Wrote {} {} to {}",
            stage_calendar.len(),
            pluralize("event", stage_calendar.len()),
            stage_path.display()
        );
    }

    Ok(())
}
