//! Stemgate CLI - batch export and preview rendering for drum stems.

mod commands;
mod manifest;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stemgate")]
#[command(author, version, about = "Drum-stem noise gate engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gate and export stems listed in a manifest
    Export(commands::export::ExportArgs),

    /// Render a gate preview for a single stem
    Preview(commands::preview::PreviewArgs),

    /// List drum classes and their tuned profiles
    Profiles(commands::profiles::ProfilesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export(args) => commands::export::run(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Profiles(args) => commands::profiles::run(args),
    }
}
