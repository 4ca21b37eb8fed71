//! Two perfect-information board games (Tic-Tac-Toe and Connect-4) modeled
//! as abstract worlds, with adversarial-search and reinforcement-learning
//! agents competing over them.
//!
//! This crate provides:
//! - Bit-packed board encoding with perspective switching
//! - Streak scanning for win detection and threat enumeration
//! - Per-game rules engines with history-free board validation
//! - Minimax search with optional depth limiting and alpha-beta pruning
//! - Perspective-normalized tabular Q-learning with JSON persistence
//! - A match runner with composable observers, and a CLI on top

pub mod adapters;
pub mod board;
pub mod cli;
pub mod error;
pub mod learn;
pub mod pipeline;
pub mod ports;
pub mod strategy;
pub mod types;
pub mod world;

pub use board::{Board, BoardCode, Cell, Shape};
pub use error::{Error, Result};
pub use learn::{CancelToken, LearnConfig, LearnReport, QLearner, QTable, StopReason};
pub use types::{GameKind, Seat};
pub use world::{Action, ConnectFour, GameStatus, Target, TicTacToe, WinStatus, World, world_for};
