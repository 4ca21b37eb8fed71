//! Minimax adversarial search with optional depth limiting and alpha-beta
//! pruning.
//!
//! The search alternates the board's perspective at every ply: children of
//! a node are generated from the mover's point of view and then flipped
//! before recursing, so that the engine's state and evaluation functions
//! are always called "from the mover-to-act's perspective". Leaves reached
//! on the minimizing side are flipped back before evaluation.

use crate::{
    Result,
    board::Board,
    ports::Strategy,
    types::Seat,
    world::{Action, World},
};

/// Result of a search: the value of the best reachable line and the action
/// sequence achieving it. The first action of the line is the move to play.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub value: f64,
    pub line: Vec<Action>,
}

/// Minimax search configuration.
///
/// `depth: None` searches to terminal states only; tractable for
/// Tic-Tac-Toe, but Connect-4 needs an explicit cap in practice.
#[derive(Debug, Clone, Copy)]
pub struct Minimax {
    pub depth: Option<u32>,
    pub alpha_beta: bool,
}

impl Minimax {
    pub fn new(depth: Option<u32>, alpha_beta: bool) -> Self {
        Minimax { depth, alpha_beta }
    }

    /// Search from a board expressed in the acting seat's perspective.
    ///
    /// The caller's seat is always the maximizing side.
    pub fn search(&self, world: &dyn World, board: &Board, seat: Seat) -> SearchOutcome {
        let window = if self.alpha_beta {
            Some([f64::NEG_INFINITY, f64::INFINITY])
        } else {
            None
        };
        self.node(world, board, seat, true, self.depth, window, Vec::new())
    }

    #[allow(clippy::too_many_arguments)]
    fn node(
        &self,
        world: &dyn World,
        board: &Board,
        seat: Seat,
        is_max: bool,
        depth: Option<u32>,
        mut window: Option<[f64; 2]>,
        taken: Vec<Action>,
    ) -> SearchOutcome {
        // Depth exhausted or terminal position: score the leaf. The board
        // belongs to the minimizing side's perspective at min nodes and
        // must be normalized to the searcher's side before evaluation.
        if depth == Some(0) || world.game_over(board).is_terminal() {
            let normalized;
            let view = if is_max {
                board
            } else {
                normalized = board.flipped();
                &normalized
            };
            return SearchOutcome {
                value: world.evaluate(view, !is_max),
                line: taken,
            };
        }

        let mover = if is_max { seat } else { seat.opponent() };
        let shape = world.shape();
        let child_depth = depth.map(|d| d - 1);

        let mut best = SearchOutcome {
            value: if is_max {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            },
            line: Vec::new(),
        };

        for (code, action) in world.next_states(board, mover) {
            let child = code.decode(shape).flipped();
            let mut child_taken = taken.clone();
            child_taken.push(action);

            // Each child gets its own copy of the window; updates flow
            // down, never back up.
            let outcome = self.node(world, &child, seat, !is_max, child_depth, window, child_taken);
            let value = outcome.value;

            // Strict comparison: the first action reaching the extremum
            // wins ties, which keeps the search deterministic.
            if is_max {
                if value > best.value {
                    best = outcome;
                }
            } else if value < best.value {
                best = outcome;
            }

            if let Some(w) = &mut window {
                if is_max {
                    w[0] = w[0].max(value);
                } else {
                    w[1] = w[1].min(value);
                }
                if w[1] <= w[0] {
                    break;
                }
            }
        }

        best
    }
}

/// Strategy adapter wrapping [`Minimax`].
#[derive(Debug, Clone)]
pub struct MinimaxStrategy {
    minimax: Minimax,
    name: String,
}

impl MinimaxStrategy {
    pub fn new(depth: Option<u32>, alpha_beta: bool) -> Self {
        let name = match (depth, alpha_beta) {
            (Some(d), true) => format!("minimax:{d}:ab"),
            (Some(d), false) => format!("minimax:{d}"),
            (None, true) => "minimax:ab".to_string(),
            (None, false) => "minimax".to_string(),
        };
        MinimaxStrategy {
            minimax: Minimax::new(depth, alpha_beta),
            name,
        }
    }

    pub fn search(&self, world: &dyn World, board: &Board, seat: Seat) -> SearchOutcome {
        self.minimax.search(world, board, seat)
    }
}

impl Strategy for MinimaxStrategy {
    fn select_move(&mut self, world: &dyn World, board: &Board, seat: Seat) -> Result<Action> {
        let outcome = self.minimax.search(world, board, seat);
        outcome
            .line
            .first()
            .copied()
            .ok_or_else(|| crate::Error::NoLegalActions {
                seat: seat.number(),
                board: board.to_string(),
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::Shape,
        world::{Target, TicTacToe},
    };

    fn board(text: &str) -> Board {
        Board::from_text(Shape::TIC_TAC_TOE, text).unwrap()
    }

    #[test]
    fn test_takes_immediate_win_over_everything() {
        // Completing the top row at depth 1 with pruning enabled.
        let world = TicTacToe;
        let b = board("XX. OO. ...");
        let mut strategy = MinimaxStrategy::new(Some(1), true);
        let action = strategy.select_move(&world, &b, Seat::One).unwrap();
        assert_eq!(action.target, Target::Cell { row: 0, col: 2 });
    }

    #[test]
    fn test_blocks_opponent_win() {
        // Own win is unavailable; the opponent threatens the middle row.
        let world = TicTacToe;
        let b = board("X.. OO. ..X");
        let mut strategy = MinimaxStrategy::new(Some(2), true);
        let action = strategy.select_move(&world, &b, Seat::One).unwrap();
        assert_eq!(action.target, Target::Cell { row: 1, col: 2 });
    }

    #[test]
    fn test_deterministic_across_invocations() {
        let world = TicTacToe;
        let b = board("X.O .X. O..");
        let mut strategy = MinimaxStrategy::new(Some(3), true);
        let first = strategy.select_move(&world, &b, Seat::One).unwrap();
        for _ in 0..3 {
            assert_eq!(strategy.select_move(&world, &b, Seat::One).unwrap(), first);
        }
    }

    #[test]
    fn test_pruning_preserves_root_value() {
        let world = TicTacToe;
        let boards = ["... ... ...", "X.. .O. ...", "XO. .X. O..", "XOX .O. OX."];
        for text in boards {
            let b = board(text);
            for depth in [1, 2, 3, 4] {
                let plain = Minimax::new(Some(depth), false).search(&world, &b, Seat::One);
                let pruned = Minimax::new(Some(depth), true).search(&world, &b, Seat::One);
                assert_eq!(
                    plain.value, pruned.value,
                    "depth {depth} value diverged on {text}"
                );
                assert_eq!(
                    plain.line.first(),
                    pruned.line.first(),
                    "depth {depth} move diverged on {text}"
                );
            }
        }
    }

    #[test]
    fn test_unlimited_depth_reaches_terminals() {
        // One move from a forced draw: unlimited search must finish.
        let world = TicTacToe;
        let b = board("XOX XOO O.X");
        let outcome = Minimax::new(None, true).search(&world, &b, Seat::One);
        assert_eq!(outcome.line.len(), 1);
        assert_eq!(
            outcome.line[0].target,
            Target::Cell { row: 2, col: 1 }
        );
    }

    #[test]
    fn test_terminal_board_returns_empty_line() {
        let world = TicTacToe;
        let b = board("XXX OO. ...");
        let outcome = Minimax::new(None, false).search(&world, &b, Seat::One);
        assert!(outcome.line.is_empty());
        assert_eq!(outcome.value, 10.0);

        let mut strategy = MinimaxStrategy::new(None, false);
        assert!(strategy.select_move(&world, &b, Seat::One).is_err());
    }
}
