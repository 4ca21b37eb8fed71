//! duelgrid CLI - train and pit game-playing agents
//!
//! Subcommands:
//! - `train`: tabular Q-learning over Tic-Tac-Toe or Connect-4
//! - `play`: run games between any two strategies

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "duelgrid")]
#[command(version, about = "Adversarial search and Q-learning game agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a tabular Q-learning policy
    Train(duelgrid::cli::commands::train::TrainArgs),

    /// Play games between two strategies
    Play(duelgrid::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => duelgrid::cli::commands::train::execute(args),
        Commands::Play(args) => duelgrid::cli::commands::play::execute(args),
    }
}
