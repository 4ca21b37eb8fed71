//! Strategy port - the move-selection contract shared by all agents.

use crate::{
    Result,
    board::Board,
    types::Seat,
    world::{Action, World},
};

/// Unified move-selection interface.
///
/// One contract serves every decision-making approach: adversarial search,
/// learned-policy lookup, the default win-or-block heuristic, uniform
/// random play, and manual input.
///
/// The board is always expressed from the acting seat's perspective.
/// Returning an error is reserved for genuinely broken situations (no legal
/// action from a reachable state, unreadable manual input); an ordinary bad
/// position is not an error.
pub trait Strategy: Send {
    /// Select an action for the given seat on the given board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] if the seat has no legal
    /// action at all, which indicates a modeling defect rather than a game
    /// outcome.
    fn select_move(&mut self, world: &dyn World, board: &Board, seat: Seat) -> Result<Action>;

    /// Name used in logs, metrics, and CSV output.
    fn name(&self) -> &str;

    /// Seed the strategy's internal random number generator, if it has one.
    ///
    /// Deterministic runs call this with a fixed seed. Stateless strategies
    /// keep the default no-op.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
