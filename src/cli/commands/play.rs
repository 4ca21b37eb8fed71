//! Play command - pit two strategies against each other.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    adapters::JsonPolicyRepository,
    cli::output::{print_kv, print_section},
    pipeline::{CsvObserver, MatchConfig, MatchRunner, PrintObserver, ProgressObserver},
    ports::{PolicyRepository, Strategy},
    types::{GameKind, Seat},
    world::world_for,
};

const STRATEGY_SPECS: &str = "minimax[:depth][:ab], policy:<file.json>, heuristic, random, manual";

#[derive(Parser, Debug)]
#[command(about = "Play games between two strategies")]
pub struct PlayArgs {
    /// Game to play (`ttt` or `connect4`)
    pub game: String,

    /// Seat 1 strategy spec
    #[arg(long, default_value = "heuristic")]
    pub player1: String,

    /// Seat 2 strategy spec
    #[arg(long, default_value = "random")]
    pub player2: String,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional CSV file receiving one row per game
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Identifier written into the CSV rows
    #[arg(long, default_value = "session")]
    pub session_id: String,

    /// Print every move and board
    #[arg(long, default_value_t = false)]
    pub show_moves: bool,

    /// Show a progress bar over games
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

/// Build a strategy from its spec string.
pub(crate) fn parse_strategy(spec: &str) -> Result<Box<dyn Strategy>> {
    let spec = spec.trim();
    let mut parts = spec.split(':');
    let head = parts.next().unwrap_or_default().to_ascii_lowercase();

    let bad = || {
        anyhow!(crate::Error::ParseStrategySpec {
            input: spec.to_string(),
            expected: STRATEGY_SPECS.to_string(),
        })
    };

    match head.as_str() {
        "minimax" => {
            let mut depth = None;
            let mut alpha_beta = false;
            for part in parts {
                match part.to_ascii_lowercase().as_str() {
                    "ab" => alpha_beta = true,
                    number => {
                        depth = Some(number.parse::<u32>().map_err(|_| bad())?);
                    }
                }
            }
            Ok(Box::new(crate::strategy::MinimaxStrategy::new(
                depth, alpha_beta,
            )))
        }
        "policy" => {
            // The remainder may itself contain colons on exotic paths.
            let path: PathBuf = spec
                .splitn(2, ':')
                .nth(1)
                .filter(|rest| !rest.is_empty())
                .ok_or_else(bad)?
                .into();
            let table = JsonPolicyRepository::new()
                .load(&path)
                .with_context(|| format!("failed to load policy from {}", path.display()))?;
            Ok(Box::new(crate::strategy::PolicyStrategy::new(table)))
        }
        "heuristic" => Ok(Box::new(crate::strategy::HeuristicStrategy::new())),
        "random" => Ok(Box::new(crate::strategy::RandomStrategy::new())),
        "manual" => Ok(Box::new(crate::strategy::ManualStrategy::stdin())),
        _ => Err(bad()),
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let kind: GameKind = args.game.parse()?;
    let world = world_for(kind);

    let mut player1 = parse_strategy(&args.player1)?;
    let mut player2 = parse_strategy(&args.player2)?;

    let mut runner = MatchRunner::new(MatchConfig {
        num_games: args.games,
        seed: args.seed,
    });
    if args.show_moves {
        runner = runner.with_observer(Box::new(PrintObserver::new()));
    }
    if args.progress {
        runner = runner.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.csv {
        runner = runner.with_observer(Box::new(CsvObserver::new(
            path,
            &args.session_id,
            kind.to_string(),
            player1.name(),
            player2.name(),
        )));
    }

    let stats = runner
        .run(world.as_ref(), player1.as_mut(), player2.as_mut())
        .context("play session failed")?;

    print_section("Session summary");
    print_kv("game", &kind.to_string());
    print_kv("games", &stats.games.to_string());
    print_kv(
        &format!("seat 1 ({})", player1.name()),
        &format!(
            "{} wins ({:.1}%)",
            stats.wins[Seat::One.index()],
            stats.win_rate(Seat::One) * 100.0
        ),
    );
    print_kv(
        &format!("seat 2 ({})", player2.name()),
        &format!(
            "{} wins ({:.1}%)",
            stats.wins[Seat::Two.index()],
            stats.win_rate(Seat::Two) * 100.0
        ),
    );
    print_kv("draws", &stats.draws.to_string());
    print_kv("total moves", &stats.total_moves.to_string());
    print_kv(
        "avg game time",
        &format!("{:.2} ms", stats.avg_game_millis),
    );

    Ok(())
}
