//! Retrovue CLI - Catalog browser and headless playback simulator
//!
//! Features:
//! - Catalog listing, grouped by category
//! - Related-video and next-in-category lookups
//! - Simulated playback session with autoplay countdown

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;
mod sim;

/// Retrovue CLI - Retro video browser toolkit
#[derive(Parser)]
#[command(name = "retrovue-cli")]
#[command(version)]
#[command(about = "Browse the Retrovue catalog and simulate playback sessions", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Path to the catalog dataset
    #[arg(long, default_value = "data/catalog.json")]
    catalog: PathBuf,

    /// Player configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog grouped by category
    Catalog,

    /// Show videos related to a video
    Related {
        /// Video id
        id: String,
    },

    /// Show the video autoplay would pick after a video
    Next {
        /// Video id
        id: String,
    },

    /// Play a video on a simulated surface and follow autoplay
    Simulate {
        /// Video id to start with
        id: String,

        /// Number of videos to play before stopping
        #[arg(short, long, default_value = "3")]
        plays: usize,

        /// Length of every simulated video in seconds
        #[arg(long, default_value = "5")]
        clip_seconds: f64,

        /// Simulated seconds per real second
        #[arg(short, long, default_value = "4")]
        speed: u32,

        /// Cancel the first autoplay countdown instead of following it
        #[arg(long)]
        cancel: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .init();

    retrovue_core::init();

    let catalog = commands::load_catalog(&cli.catalog)?;
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Catalog => {
            commands::catalog(&catalog, &cli.format)?;
        }
        Commands::Related { id } => {
            commands::related(&catalog, &id, &cli.format)?;
        }
        Commands::Next { id } => {
            commands::next(&catalog, &id, &cli.format)?;
        }
        Commands::Simulate { id, plays, clip_seconds, speed, cancel } => {
            let options = sim::SimulationOptions {
                plays,
                clip_seconds,
                speed,
                cancel,
            };
            sim::simulate(catalog, config, &id, options).await?;
        }
    }

    Ok(())
}
