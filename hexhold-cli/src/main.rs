//! HEXHOLD CLI - Command-line interface
//!
//! Commands:
//! - play: run an AI-vs-AI match
//! - levels: list the built-in level catalog
//! - generate: emit a generated level config

use clap::{Parser, Subcommand};

mod levels;
mod play;

#[derive(Parser)]
#[command(name = "hexhold")]
#[command(about = "Hex-grid strategy match runner")]
struct Cli {
    /// RNG seed for random level generation
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an AI-vs-AI match
    Play(play::PlayArgs),
    /// List the built-in level catalog
    Levels(levels::LevelsArgs),
    /// Generate a level config
    Generate(levels::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Levels(args) => levels::run_levels(args),
        Commands::Generate(args) => levels::run_generate(args, cli.seed),
    }
}
