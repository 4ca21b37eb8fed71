//! Default heuristic play: win if possible, block if possible, otherwise
//! random.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    board::Board,
    ports::Strategy,
    types::Seat,
    world::{Action, World},
};

/// The baseline opponent: completes an own win line when one move does it,
/// otherwise blocks the opponent's completing move, otherwise plays a
/// random legal action.
#[derive(Debug)]
pub struct HeuristicStrategy {
    rng: StdRng,
}

impl HeuristicStrategy {
    pub fn new() -> Self {
        HeuristicStrategy {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        HeuristicStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for HeuristicStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for HeuristicStrategy {
    fn select_move(&mut self, world: &dyn World, board: &Board, seat: Seat) -> Result<Action> {
        let found = world.completions(board);

        // Win-completing targets come first, then blocks. Completion
        // targets are playable by construction, but the resulting state
        // must still be valid, so verify through next_state.
        for target in found.own.into_iter().chain(found.opp) {
            let action = Action { target, seat };
            if world.next_state(board, action).is_some() {
                return Ok(action);
            }
        }

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
        "heuristic"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::Shape,
        world::{ConnectFour, Target, TicTacToe},
    };

    fn ttt(text: &str) -> Board {
        Board::from_text(Shape::TIC_TAC_TOE, text).unwrap()
    }

    #[test]
    fn test_takes_the_win() {
        let world = TicTacToe;
        let board = ttt("XX. OO. ...");
        let mut strategy = HeuristicStrategy::with_seed(3);
        let action = strategy.select_move(&world, &board, Seat::One).unwrap();
        assert_eq!(action.target, Target::Cell { row: 0, col: 2 });
    }

    #[test]
    fn test_blocks_when_it_cannot_win() {
        let world = TicTacToe;
        let board = ttt("X.. OO. ..X");
        let mut strategy = HeuristicStrategy::with_seed(3);
        let action = strategy.select_move(&world, &board, Seat::One).unwrap();
        assert_eq!(action.target, Target::Cell { row: 1, col: 2 });
    }

    #[test]
    fn test_prefers_win_over_block() {
        let world = TicTacToe;
        // Both sides threaten; taking the win beats blocking.
        let board = ttt("XX. OO. ..."); // own row 0 and opponent row 1 both open
        let mut strategy = HeuristicStrategy::with_seed(3);
        let action = strategy.select_move(&world, &board, Seat::One).unwrap();
        assert_eq!(action.target, Target::Cell { row: 0, col: 2 });
    }

    #[test]
    fn test_blocks_connect4_column() {
        let world = ConnectFour;
        let board = Board::from_text(
            Shape::CONNECT_FOUR,
            "....... ....... ....... ..O.... ..O.... ..OXX..",
        )
        .unwrap();
        let mut strategy = HeuristicStrategy::with_seed(9);
        let action = strategy.select_move(&world, &board, Seat::One).unwrap();
        assert_eq!(action.target, Target::Drop { col: 2 });
    }

    #[test]
    fn test_falls_back_to_random_legal() {
        let world = TicTacToe;
        let board = ttt("X.. .O. ...");
        let mut strategy = HeuristicStrategy::with_seed(5);
        let action = strategy.select_move(&world, &board, Seat::One).unwrap();
        assert!(world.is_legal(&board, action));
    }
}
