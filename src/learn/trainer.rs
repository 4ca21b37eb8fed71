//! Episode-driven Q-learning trainer.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use rand::{
    Rng, SeedableRng,
    rngs::StdRng,
    seq::{IndexedRandom, IteratorRandom},
};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    board::BoardCode,
    learn::QTable,
    types::Seat,
    world::World,
};

/// Cooperative cancellation flag, checked at episode and ply boundaries.
///
/// An external interrupt sets the flag; the learner notices at the next
/// boundary and returns a partial report instead of losing progress.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Hyperparameters and budgets for one learning pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnConfig {
    /// Learning rate alpha.
    pub alpha: f64,
    /// Discount factor gamma.
    pub gamma: f64,
    /// Episode budget.
    pub max_episodes: u64,
    /// Optional wall-clock budget.
    pub time_budget: Option<Duration>,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for LearnConfig {
    fn default() -> Self {
        LearnConfig {
            alpha: 0.5,
            gamma: 0.9,
            max_episodes: 10_000,
            time_budget: None,
            seed: None,
        }
    }
}

/// Which stopping condition ended a learning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EpisodeBudget,
    TimeBudget,
    Cancelled,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::EpisodeBudget => write!(f, "episode_budget"),
            StopReason::TimeBudget => write!(f, "time_budget"),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Outcome of one learning pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnReport {
    pub episodes: u64,
    /// Total Q-updates applied (one per move visited).
    pub moves_visited: u64,
    pub stop: StopReason,
    pub elapsed: Duration,
}

/// Tabular Q-learner over a world's encoded state space.
///
/// Owns the Q-table being trained plus the pool of not-yet-visited
/// canonical start states per seat. The learner itself is game-agnostic;
/// the world supplies rules, rewards, and start states.
pub struct QLearner {
    table: QTable,
    unexplored_starts: [Vec<BoardCode>; 2],
    rng: StdRng,
}

impl QLearner {
    /// Create a fresh learner for a world.
    pub fn new(world: &dyn World) -> Self {
        Self::with_table(world, QTable::default())
    }

    /// Create a learner continuing from a previously trained table.
    pub fn with_table(world: &dyn World, table: QTable) -> Self {
        QLearner {
            table,
            unexplored_starts: [
                world.start_states(Seat::One),
                world.start_states(Seat::Two),
            ],
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn into_table(self) -> QTable {
        self.table
    }

    /// Pick an episode start state in seat 1's frame.
    ///
    /// Unvisited canonical start states are preferred; once the pool is
    /// exhausted, sample uniformly among already-known states. Start states
    /// arrive in the starting seat's own perspective and are normalized
    /// here; known states are stored normalized already.
    fn random_start(&mut self, world: &dyn World, seat: Seat) -> BoardCode {
        if let Some(code) = self.unexplored_starts[seat.index()].pop() {
            return normalize(world, code, seat);
        }
        if let Some(code) = self.table.states(seat).choose(&mut self.rng) {
            return code;
        }
        // Table still empty for this seat: fall back to a canonical start.
        let starts = world.start_states(seat);
        let code = starts[self.rng.random_range(0..starts.len())];
        normalize(world, code, seat)
    }

    /// Run Q-learning episodes until a stopping condition fires.
    ///
    /// `start_seat` selects which seat's start-state pool opens each
    /// episode; within an episode both seats move (and both tables learn)
    /// alternately.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] if a reachable non-terminal
    /// state offers a seat no action, which signals a modeling defect.
    pub fn learn(
        &mut self,
        world: &dyn World,
        start_seat: Seat,
        config: &LearnConfig,
        cancel: &CancelToken,
    ) -> Result<LearnReport> {
        self.learn_with(world, start_seat, config, cancel, |_| {})
    }

    /// [`learn`](Self::learn) with a per-episode progress callback.
    pub fn learn_with(
        &mut self,
        world: &dyn World,
        start_seat: Seat,
        config: &LearnConfig,
        cancel: &CancelToken,
        mut on_episode: impl FnMut(u64),
    ) -> Result<LearnReport> {
        if let Some(seed) = config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        let started = Instant::now();
        let deadline = config.time_budget.map(|budget| started + budget);
        let shape = world.shape();

        let mut episodes: u64 = 0;
        let mut moves: u64 = 0;

        let stop = 'session: loop {
            if episodes >= config.max_episodes {
                break StopReason::EpisodeBudget;
            }
            if let Some(deadline) = deadline
                && Instant::now() >= deadline
            {
                break StopReason::TimeBudget;
            }
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            episodes += 1;
            let mut seat = start_seat;
            let mut state = self.random_start(world, seat);

            loop {
                if cancel.is_cancelled() {
                    break 'session StopReason::Cancelled;
                }
                if let Some(deadline) = deadline
                    && Instant::now() >= deadline
                {
                    break 'session StopReason::TimeBudget;
                }

                let board = state.decode(shape);
                if world.game_over(&board).is_terminal() {
                    break;
                }

                // The stored state lives in seat 1's frame; the rules
                // engine wants the mover's own perspective.
                let mover_board = match seat {
                    Seat::One => board,
                    Seat::Two => board.flipped(),
                };

                let choices = world.next_states(&mover_board, seat);
                let Some(&(next_code, action)) = choices.choose(&mut self.rng) else {
                    return Err(crate::Error::NoLegalActions {
                        seat: seat.number(),
                        board: mover_board.to_string(),
                    });
                };
                let next_state = normalize(world, next_code, seat);

                // Bootstrap from the other seat's estimates: the successor
                // belongs to the opponent's turn.
                let max_next = self.table.max_known(seat.opponent(), next_state);
                let reward = world.reward(&mover_board, action);
                self.table.apply_update(
                    seat,
                    state,
                    action,
                    reward,
                    max_next,
                    config.alpha,
                    config.gamma,
                );

                state = next_state;
                seat = seat.opponent();
                moves += 1;
            }

            on_episode(episodes);
        };

        Ok(LearnReport {
            episodes,
            moves_visited: moves,
            stop,
            elapsed: started.elapsed(),
        })
    }
}

/// Bring a code expressed in `seat`'s perspective into seat 1's frame.
fn normalize(world: &dyn World, code: BoardCode, seat: Seat) -> BoardCode {
    match seat {
        Seat::One => code,
        Seat::Two => code.flipped(world.shape()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TicTacToe;

    fn config(episodes: u64) -> LearnConfig {
        LearnConfig {
            alpha: 0.5,
            gamma: 0.9,
            max_episodes: episodes,
            time_budget: None,
            seed: Some(42),
        }
    }

    #[test]
    fn test_learning_populates_both_tables() {
        let world = TicTacToe;
        let mut learner = QLearner::new(&world).with_seed(42);
        let report = learner
            .learn(&world, Seat::One, &config(50), &CancelToken::new())
            .unwrap();

        assert_eq!(report.stop, StopReason::EpisodeBudget);
        assert_eq!(report.episodes, 50);
        assert!(report.moves_visited > 0);
        // Both seats move within an episode, so both tables fill up.
        assert!(learner.table().state_count(Seat::One) > 0);
        assert!(learner.table().state_count(Seat::Two) > 0);
    }

    #[test]
    fn test_cancellation_returns_partial_report() {
        let world = TicTacToe;
        let mut learner = QLearner::new(&world).with_seed(7);
        let cancel = CancelToken::new();
        cancel.cancel();

        let report = learner
            .learn(&world, Seat::One, &config(1_000_000), &cancel)
            .unwrap();
        assert_eq!(report.stop, StopReason::Cancelled);
        assert_eq!(report.episodes, 0);
    }

    #[test]
    fn test_time_budget_stops_learning() {
        let world = TicTacToe;
        let mut learner = QLearner::new(&world).with_seed(7);
        let cfg = LearnConfig {
            time_budget: Some(Duration::ZERO),
            max_episodes: u64::MAX,
            ..config(0)
        };
        let report = learner
            .learn(&world, Seat::One, &cfg, &CancelToken::new())
            .unwrap();
        assert_eq!(report.stop, StopReason::TimeBudget);
    }

    #[test]
    fn test_seat_two_start_states_are_normalized() {
        let world = TicTacToe;
        let mut learner = QLearner::new(&world).with_seed(11);
        learner
            .learn(&world, Seat::Two, &config(20), &CancelToken::new())
            .unwrap();

        // Seat 2 states are stored in seat 1's frame: every key decodes to
        // a board whose piece counts are consistent with seat 1 having the
        // extra piece or the counts being level.
        for code in learner.table().states(Seat::Two) {
            let board = code.decode(world.shape());
            let own = board.count(crate::board::Cell::Own);
            let opp = board.count(crate::board::Cell::Opp);
            assert!(own == opp + 1, "seat-2 key {code} should sit after seat 1 moved (own={own}, opp={opp})");
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let world = TicTacToe;
        let run = || {
            let mut learner = QLearner::new(&world);
            learner
                .learn(&world, Seat::One, &config(30), &CancelToken::new())
                .unwrap();
            learner.table().entry_count()
        };
        assert_eq!(run(), run());
    }
}
