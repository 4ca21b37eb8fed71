//! Train command - Q-learning over a game world.

use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    adapters::JsonPolicyRepository,
    cli::output::{create_episode_progress, print_kv, print_section},
    learn::{CancelToken, LearnConfig, LearnReport, QLearner},
    ports::PolicyRepository,
    types::{GameKind, Seat},
    world::world_for,
};

#[derive(Parser, Debug)]
#[command(about = "Train a tabular Q-learning policy")]
pub struct TrainArgs {
    /// Game to train for (`ttt` or `connect4`)
    pub game: String,

    /// Learning rate alpha
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Discount factor gamma
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Episode budget per seat pass
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: u64,

    /// Wall-clock budget in minutes, split between the two seat passes
    #[arg(long)]
    pub minutes: Option<f64>,

    /// Where to save the trained policy (.json)
    #[arg(long, short = 'O', default_value = "policy.json")]
    pub output: PathBuf,

    /// Previously trained policy to continue from
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional CSV file recording this training run
    #[arg(long)]
    pub run_log: Option<PathBuf>,

    /// Show progress bars
    #[arg(long, default_value_t = true)]
    pub progress: bool,
}

#[derive(Debug, Serialize)]
struct RunRow<'a> {
    timestamp: u64,
    game: &'a str,
    alpha: f64,
    gamma: f64,
    episodes: u64,
    moves_visited: u64,
    minutes: f64,
    stop_seat1: String,
    stop_seat2: String,
}

fn append_run_log(
    path: &Path,
    game: GameKind,
    args: &TrainArgs,
    first: &LearnReport,
    second: &LearnReport,
) -> Result<()> {
    let fresh = !path.exists();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open run log {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(fresh)
        .from_writer(file);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let minutes = (first.elapsed + second.elapsed).as_secs_f64() / 60.0;
    writer.serialize(RunRow {
        timestamp,
        game: &game.to_string(),
        alpha: args.alpha,
        gamma: args.gamma,
        episodes: first.episodes + second.episodes,
        moves_visited: first.moves_visited + second.moves_visited,
        minutes,
        stop_seat1: first.stop.to_string(),
        stop_seat2: second.stop.to_string(),
    })?;
    writer.flush()?;
    Ok(())
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let kind: GameKind = args.game.parse()?;
    let world = world_for(kind);
    let repository = JsonPolicyRepository::new();

    let mut learner = match &args.load {
        Some(path) => {
            let table = repository
                .load(path)
                .with_context(|| format!("failed to load policy from {}", path.display()))?;
            QLearner::with_table(world.as_ref(), table)
        }
        None => QLearner::new(world.as_ref()),
    };
    if let Some(seed) = args.seed {
        learner = learner.with_seed(seed);
    }

    // Split any wall-clock budget evenly across the two seat passes, the
    // same way the episode budget applies to each pass.
    let per_pass_budget = args
        .minutes
        .map(|m| Duration::from_secs_f64(m * 60.0 / 2.0));
    let cancel = CancelToken::new();

    let mut reports = Vec::with_capacity(2);
    for seat in [Seat::One, Seat::Two] {
        let config = LearnConfig {
            alpha: args.alpha,
            gamma: args.gamma,
            max_episodes: args.episodes,
            time_budget: per_pass_budget,
            seed: args.seed.map(|s| s.wrapping_add(seat.index() as u64)),
        };

        let report = if args.progress {
            let pb = create_episode_progress(args.episodes, &format!("seat {seat}"));
            let report = learner
                .learn_with(world.as_ref(), seat, &config, &cancel, |episode| {
                    pb.set_position(episode);
                })
                .with_context(|| format!("learning pass for seat {seat} failed"))?;
            pb.finish_with_message(format!("seat {seat}: {}", report.stop));
            report
        } else {
            learner
                .learn(world.as_ref(), seat, &config, &cancel)
                .with_context(|| format!("learning pass for seat {seat} failed"))?
        };
        reports.push(report);
    }

    let table = learner.into_table();
    repository
        .save(&table, &args.output)
        .with_context(|| format!("failed to save policy to {}", args.output.display()))?;

    if let Some(path) = &args.run_log {
        append_run_log(path, kind, &args, &reports[0], &reports[1])?;
    }

    print_section("Training summary");
    print_kv("game", &kind.to_string());
    print_kv(
        "episodes",
        &format!("{} + {}", reports[0].episodes, reports[1].episodes),
    );
    print_kv(
        "moves visited",
        &format!(
            "{}",
            reports[0].moves_visited + reports[1].moves_visited
        ),
    );
    print_kv(
        "stop conditions",
        &format!("{} / {}", reports[0].stop, reports[1].stop),
    );
    print_kv(
        "states learned",
        &format!(
            "{} + {}",
            table.state_count(Seat::One),
            table.state_count(Seat::Two)
        ),
    );
    print_kv("saved to", &args.output.display().to_string());

    Ok(())
}
