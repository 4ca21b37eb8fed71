//! Observer port - abstraction for match observation and data collection.
//!
//! Observers can be composed to collect different kinds of data while games
//! run, without coupling the match loop to any specific output format.

use crate::{
    Result,
    board::Board,
    pipeline::stats::{GameRecord, SessionStats},
    types::Seat,
    world::Action,
};

/// Observer of a play session.
///
/// Methods are called in this order:
/// 1. `on_session_start(total_games)` once,
/// 2. per game: `on_game_start`, then `on_move` for each move, then
///    `on_game_end`,
/// 3. `on_session_end` once.
///
/// All methods have no-op defaults; implement only what you need.
pub trait Observer: Send {
    fn on_session_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        Ok(())
    }

    /// Called after a move is executed.
    ///
    /// `board_after` is the resulting board expressed from `to_move`'s
    /// perspective (the perspective has already switched to the next
    /// player).
    fn on_move(
        &mut self,
        _game_num: usize,
        _step_num: usize,
        _mover: Seat,
        _action: Action,
        _board_after: &Board,
        _to_move: Seat,
    ) -> Result<()> {
        Ok(())
    }

    fn on_game_end(&mut self, _record: &GameRecord) -> Result<()> {
        Ok(())
    }

    fn on_session_end(&mut self, _stats: &SessionStats) -> Result<()> {
        Ok(())
    }
}
