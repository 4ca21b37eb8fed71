//! Uniformly random legal play.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    board::Board,
    ports::Strategy,
    types::Seat,
    world::{Action, World},
};

/// Picks uniformly among the seat's legal actions.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        RandomStrategy {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn select_move(&mut self, world: &dyn World, board: &Board, seat: Seat) -> Result<Action> {
        let legal: Vec<Action> = world
            .actions(seat)
            .into_iter()
            .filter(|&action| world.is_legal(board, action))
            .collect();
        legal
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| crate::Error::NoLegalActions {
                seat: seat.number(),
                board: board.to_string(),
            })
    }

    fn name(&self) -> &str {
        "random"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
