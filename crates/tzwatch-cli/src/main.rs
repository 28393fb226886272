//! tzwatch CLI Application
//!
//! Command-line front end for the tzwatch transition scanner. Logging is
//! controlled through `RUST_LOG` (for example `RUST_LOG=tzwatch_core=debug`).

mod args;
mod cli;
mod display;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands, GroupsArgs};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use tzwatch_core::SurveyBuilder;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        no_color,
        json,
        command,
    } = Args::parse();

    // Single-zone commands do not need the whole database interned.
    let zones = match &command {
        Some(Next(args)) => Some(vec![args.zone.clone()]),
        Some(Transitions(args)) => Some(vec![args.zone.clone()]),
        Some(Groups(args)) if !args.zones.is_empty() => Some(args.zones.clone()),
        _ => None,
    };

    let survey = SurveyBuilder::new()
        .with_zones(zones)
        .build()
        .await
        .context("Failed to initialize zone survey")?;

    info!("tzwatch started with {} zones", survey.registry().len());

    let cli = Cli::new(survey, TerminalRenderer::new(!no_color), json);
    match command {
        Some(Groups(args)) => cli.groups(args).await,
        Some(Next(args)) => cli.next(args).await,
        Some(Transitions(args)) => cli.transitions(args).await,
        Some(Zones) => cli.zones(),
        None => cli.groups(GroupsArgs::default()).await,
    }
}
