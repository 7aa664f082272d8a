//! Command-line front end for workflow files.

mod commands;
mod config;
mod error;

use clap::{Parser, Subcommand};
use config::CliConfig;
use error::CliError;
use flowcanvas_editor::LayoutDirection;
use rootcause::prelude::Report;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flowcanvas")]
#[command(version)]
#[command(about = "Inspect and lay out flowcanvas workflow files")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a workflow file and report on its structure
    Check {
        /// Workflow JSON file
        file: PathBuf,
    },

    /// Auto-layout a workflow file
    Layout {
        /// Workflow JSON file
        file: PathBuf,

        /// Direction in which layers advance: horizontal (lr) or vertical (tb)
        #[arg(short, long, default_value = "horizontal")]
        direction: LayoutDirection,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn run(cli: Cli) -> Result<(), Report<CliError>> {
    let config = CliConfig::from_env().map_err(|e| CliError::Config {
        details: e.to_string(),
    })?;

    match cli.command {
        Commands::Check { file } => {
            let report = commands::check(&file, &config)?;
            let summary = &report.summary;
            println!(
                "{} ({}): {} nodes, {} edges",
                summary.name, summary.id, summary.node_count, summary.edge_count
            );
            println!("entry nodes: {}", report.entry_nodes.join(", "));
            for warning in &report.warnings {
                println!("warning: {warning}");
            }
        }
        Commands::Layout {
            file,
            direction,
            output,
        } => {
            let moved = commands::layout(&file, direction, output, &config)?;
            println!("moved {moved} nodes");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("error: {}", report.current_context());
            ExitCode::FAILURE
        }
    }
}
