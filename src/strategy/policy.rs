//! Move selection from a learned Q-table.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Result,
    board::{Board, BoardCode},
    learn::QTable,
    ports::Strategy,
    types::Seat,
    world::{Action, World},
};

/// Greedy lookup over a trained [`QTable`], with optimism under partial
/// knowledge.
///
/// Seat 2 boards are normalized into seat 1's frame before lookup, matching
/// how the table was trained. For wholly unknown states the strategy plays
/// a random untried legal action; for known states it plays the argmax, but
/// a negative argmax with untried actions remaining triggers exploration of
/// an untried one instead.
pub struct PolicyStrategy {
    table: QTable,
    rng: StdRng,
    name: String,
}

impl PolicyStrategy {
    pub fn new(table: QTable) -> Self {
        PolicyStrategy {
            table,
            rng: StdRng::from_rng(&mut rand::rng()),
            name: "policy".to_string(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// A random legal action not yet recorded for this state, if any.
    ///
    /// Candidates are tried in random order; an action qualifies when it is
    /// unrecorded and actually playable from the mover's perspective.
    fn random_untried(
        &mut self,
        world: &dyn World,
        mover_board: &Board,
        state: BoardCode,
        seat: Seat,
    ) -> Option<Action> {
        let mut candidates = world.actions(seat);
        while !candidates.is_empty() {
            let index = self.rng.random_range(0..candidates.len());
            let action = candidates.swap_remove(index);
            let already_known = self
                .table
                .known_actions(seat, state)
                .is_some_and(|actions| actions.contains_key(&action));
            if !already_known && world.next_state(mover_board, action).is_some() {
                return Some(action);
            }
        }
        None
    }
}

impl Strategy for PolicyStrategy {
    fn select_move(&mut self, world: &dyn World, board: &Board, seat: Seat) -> Result<Action> {
        let shape = world.shape();
        // Lookups happen in seat 1's frame; the rules engine still wants
        // the mover's own perspective for legality checks.
        let state = match seat {
            Seat::One => board.encode(),
            Seat::Two => board.encode().flipped(shape),
        };

        let no_legal = |board: &Board| crate::Error::NoLegalActions {
            seat: seat.number(),
            board: board.to_string(),
        };

        // Wholly unknown state: explore a random untried action.
        if !self.table.knows_state(seat, state) {
            return self
                .random_untried(world, board, state, seat)
                .ok_or_else(|| no_legal(board));
        }

        // Known state: greedy argmax over recorded actions. HashMap
        // iteration order is arbitrary, so sort for deterministic
        // tie-breaking.
        let mut entries: Vec<(Action, f64)> = self
            .table
            .known_actions(seat, state)
            .expect("state known by check above")
            .iter()
            .map(|(&action, &value)| (action, value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let known_len = entries.len();

        let mut best: Option<(Action, f64)> = None;
        for (action, value) in entries {
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }
        let (argmax, max_value) = best.ok_or_else(|| no_legal(board))?;

        // A negative best with unexplored alternatives is a cue to try
        // something new; the untried action may lead somewhere better.
        let total_actions = world.actions(seat).len();
        if max_value < 0.0 && known_len < total_actions {
            if let Some(action) = self.random_untried(world, board, state, seat) {
                return Ok(action);
            }
        }

        Ok(argmax)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
