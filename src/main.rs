mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vctcal_core::VctConfig;

#[derive(Parser)]
#[command(name = "vctcal")]
#[command(about = "Keep a VCT match calendar in step with vlr.gg")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a calendar from a stage's matches
    Generate {
        /// Stage to fetch (defaults to the active stage)
        #[arg(short, long)]
        stage: Option<String>,

        /// Calendar file to write (defaults to calendar_path from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Add the stage's matches to an existing calendar instead of replacing it
        #[arg(long)]
        append: bool,

        /// Also write a calendar holding only this stage
        #[arg(long)]
        save_stage: bool,

        /// List every event instead of counts
        #[arg(short, long)]
        verbose: bool,
    },
    /// Refresh the matches already in a calendar
    Update {
        /// Calendar file to read (defaults to calendar_path from the config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write the result (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only update these stages (repeatable)
        #[arg(short, long = "stage")]
        stages: Vec<String>,

        /// Only update stages that still have matches ahead
        #[arg(long)]
        upcoming: bool,

        /// List every event instead of counts
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show configured stages and what a calendar holds
    Stages {
        /// Calendar file to inspect (defaults to calendar_path from the config)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = VctConfig::load()?;

    let run = async {
        match cli.command {
            Commands::Generate {
                stage,
                output,
                append,
                save_stage,
                verbose,
            } => {
                let args = commands::generate::GenerateArgs {
                    stage,
                    output,
                    append,
                    save_stage,
                    verbose,
                };
                commands::generate::run(&config, args).await
            }
            Commands::Update {
                input,
                output,
                stages,
                upcoming,
                verbose,
            } => {
                let args = commands::update::UpdateArgs {
                    input,
                    output,
                    stages,
                    upcoming,
                    verbose,
                };
                commands::update::run(&config, args).await
            }
            Commands::Stages { input } => commands::stages::run(&config, input),
        }
    };

    // Commands write files last; dropping the run on Ctrl-C writes nothing
    tokio::select! {
        result = run => result,
        _ = tokio::signal::ctrl_c() => {
            Err(anyhow::anyhow!("Interrupted, no calendar was written"))
        }
    }
}
