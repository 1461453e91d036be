//! Reversi CLI - Command-line interface
//!
//! Commands:
//! - best-move: Recommend a move for a board read as JSON
//! - play: Play against the AI in the terminal
//! - match: Play AI-vs-AI games and report the results

mod best_move_cmd;
mod match_cmd;
mod play_cmd;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reversi_core::AiConfig;

#[derive(Parser)]
#[command(name = "reversi")]
#[command(about = "Reversi rules engine with an alpha-beta opponent")]
struct Cli {
    /// Random seed for reproducible play
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// AI configuration JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a move for a serialized board
    BestMove(best_move_cmd::BestMoveArgs),
    /// Play a game against the AI
    Play(play_cmd::PlayArgs),
    /// Play AI-vs-AI games
    Match(match_cmd::MatchArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::BestMove(args) => best_move_cmd::run(args, config),
        Commands::Play(args) => play_cmd::run(args, config),
        Commands::Match(args) => match_cmd::run(args, config),
    }
}

/// Build the AI configuration from an optional file and seed override
fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<AiConfig> {
    let mut config = match path {
        Some(path) => AiConfig::load(path)
            .with_context(|| format!("Failed to load AI config: {}", path.display()))?,
        None => AiConfig::default(),
    };

    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    tracing::debug!(
        "AI config: depth={}, opening_threshold={}, seed={:?}",
        config.depth,
        config.opening_threshold,
        config.seed
    );

    Ok(config)
}

/// Apply a per-command depth override and check the result
fn with_depth(config: AiConfig, depth: Option<u32>) -> Result<AiConfig> {
    let config = match depth {
        Some(depth) => config.with_depth(depth),
        None => config,
    };
    config.validate()?;
    Ok(config)
}
