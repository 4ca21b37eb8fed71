//! The game loop: one mutable current-board cell threaded through pure
//! core calls.
//!
//! The runner owns the only mutable board in the system. After every
//! successful move the board's perspective flips, so each strategy always
//! receives a board expressed from its own point of view.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    board::Board,
    pipeline::stats::{GameRecord, SessionStats},
    ports::{Observer, Strategy},
    types::Seat,
    world::{GameStatus, WinStatus, World},
};

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub num_games: usize,
    /// Base seed for the strategies' RNGs; each strategy gets an offset.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            num_games: 1,
            seed: None,
        }
    }
}

/// Runs games between two strategies and aggregates statistics.
pub struct MatchRunner {
    config: MatchConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        MatchRunner {
            config,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Play the configured number of games.
    ///
    /// # Errors
    ///
    /// Propagates strategy failures and [`Error::MoveRejected`] when a
    /// strategy returns an action the rules engine will not accept. A bad
    /// move is a defect in the strategy, not a recoverable game event.
    pub fn run(
        &mut self,
        world: &dyn World,
        player1: &mut dyn Strategy,
        player2: &mut dyn Strategy,
    ) -> Result<SessionStats> {
        if let Some(seed) = self.config.seed {
            player1.set_rng_seed(seed)?;
            player2.set_rng_seed(seed.wrapping_add(1))?;
        }

        for observer in &mut self.observers {
            observer.on_session_start(self.config.num_games)?;
        }

        let mut stats = SessionStats::default();
        for game_num in 0..self.config.num_games {
            let record = self.play_game(game_num, world, player1, player2)?;
            stats.record(&record);
            for observer in &mut self.observers {
                observer.on_game_end(&record)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_session_end(&stats)?;
        }

        Ok(stats)
    }

    fn play_game(
        &mut self,
        game_num: usize,
        world: &dyn World,
        player1: &mut dyn Strategy,
        player2: &mut dyn Strategy,
    ) -> Result<GameRecord> {
        for observer in &mut self.observers {
            observer.on_game_start(game_num)?;
        }

        let game_started = Instant::now();
        // The board always sits in the next mover's perspective.
        let mut board = Board::empty(world.shape());
        let mut to_move = Seat::One;
        let mut moves = [0usize; 2];
        let mut move_millis = [0.0f64; 2];
        let mut step_num = 0;

        while world.game_over(&board) == GameStatus::Ongoing {
            let strategy: &mut dyn Strategy = if to_move == Seat::One {
                player1
            } else {
                player2
            };

            let move_started = Instant::now();
            let action = strategy.select_move(world, &board, to_move)?;
            let elapsed_ms = move_started.elapsed().as_secs_f64() * 1000.0;

            let Some(code) = world.next_state(&board, action) else {
                return Err(Error::MoveRejected {
                    strategy: strategy.name().to_string(),
                    action: action.to_string(),
                    board: board.to_string(),
                });
            };

            let seat = to_move;
            moves[seat.index()] += 1;
            // Running mean of this seat's selection time.
            let n = moves[seat.index()] as f64;
            move_millis[seat.index()] += (elapsed_ms - move_millis[seat.index()]) / n;

            // Flip into the next mover's perspective and hand over the turn.
            board = code.decode(world.shape()).flipped();
            to_move = seat.opponent();
            step_num += 1;

            for observer in &mut self.observers {
                observer.on_move(game_num, step_num, seat, action, &board, to_move)?;
            }
        }

        // The final board sits in the next mover's perspective; a loss
        // there means the player who just moved won.
        let winner = match world.winner(&board) {
            WinStatus::Lost => Some(to_move.opponent()),
            WinStatus::Won => Some(to_move),
            WinStatus::Open => None,
        };

        Ok(GameRecord {
            game_num,
            winner,
            moves,
            avg_move_millis: move_millis,
            total_millis: game_started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        strategy::{HeuristicStrategy, MinimaxStrategy, RandomStrategy},
        world::{Action, TicTacToe},
    };

    #[test]
    fn test_session_accounts_for_every_game() {
        let world = TicTacToe;
        let mut runner = MatchRunner::new(MatchConfig {
            num_games: 20,
            seed: Some(42),
        });
        let mut p1 = RandomStrategy::new();
        let mut p2 = RandomStrategy::new();

        let stats = runner.run(&world, &mut p1, &mut p2).unwrap();
        assert_eq!(stats.games, 20);
        assert_eq!(stats.wins[0] + stats.wins[1] + stats.draws, 20);
        assert!(stats.total_moves >= 20 * 5);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let world = TicTacToe;
        let run = || {
            let mut runner = MatchRunner::new(MatchConfig {
                num_games: 10,
                seed: Some(7),
            });
            let mut p1 = RandomStrategy::new();
            let mut p2 = HeuristicStrategy::new();
            let stats = runner.run(&world, &mut p1, &mut p2).unwrap();
            (stats.wins, stats.draws, stats.total_moves)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_minimax_never_loses_to_random() {
        let world = TicTacToe;
        let mut runner = MatchRunner::new(MatchConfig {
            num_games: 10,
            seed: Some(3),
        });
        let mut p1 = MinimaxStrategy::new(Some(4), true);
        let mut p2 = RandomStrategy::new();

        let stats = runner.run(&world, &mut p1, &mut p2).unwrap();
        assert_eq!(stats.wins[Seat::Two.index()], 0);
    }

    #[test]
    fn test_rejected_move_is_a_hard_error() {
        struct Stubborn;
        impl Strategy for Stubborn {
            fn select_move(
                &mut self,
                _world: &dyn World,
                _board: &Board,
                seat: Seat,
            ) -> Result<Action> {
                // Always the same cell, legal only once.
                Ok(Action::place(0, 0, seat))
            }
            fn name(&self) -> &str {
                "stubborn"
            }
        }

        let world = TicTacToe;
        let mut runner = MatchRunner::new(MatchConfig {
            num_games: 1,
            seed: None,
        });
        let mut p1 = Stubborn;
        let mut p2 = Stubborn;
        let err = runner.run(&world, &mut p1, &mut p2).unwrap_err();
        assert!(matches!(err, Error::MoveRejected { .. }));
    }
}
