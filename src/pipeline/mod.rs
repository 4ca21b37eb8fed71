//! Match orchestration: the game loop, session statistics, and observers.

pub mod match_runner;
pub mod observers;
pub mod stats;

pub use match_runner::{MatchConfig, MatchRunner};
pub use observers::{CsvObserver, MetricsObserver, PrintObserver, ProgressObserver};
pub use stats::{GameRecord, SessionStats};
