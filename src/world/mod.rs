//! Game world contract shared by both games.
//!
//! A world bundles the rules of one game: which actions exist, when they
//! are legal, which boards are globally valid, when the game is over, and
//! how good a position looks. Worlds are stateless; every function takes
//! the board it operates on, always expressed from the acting player's
//! perspective.

pub mod connect4;
pub mod tictactoe;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use connect4::ConnectFour;
pub use tictactoe::TicTacToe;

use crate::{
    board::{Board, BoardCode, Cell, Shape},
    types::{GameKind, Seat},
};

/// Reward for an action that is illegal or produces an invalid board.
pub const ILLEGAL_MOVE_REWARD: f64 = -150.0;

/// Where an action places a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Target {
    /// Direct placement at a cell (Tic-Tac-Toe).
    Cell { row: usize, col: usize },
    /// Gravity drop into a column (Connect-4).
    Drop { col: usize },
}

/// A (target, mover) pair: what is played and which seat plays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action {
    pub target: Target,
    pub seat: Seat,
}

impl Action {
    pub fn place(row: usize, col: usize, seat: Seat) -> Self {
        Action {
            target: Target::Cell { row, col },
            seat,
        }
    }

    pub fn drop(col: usize, seat: Seat) -> Self {
        Action {
            target: Target::Drop { col },
            seat,
        }
    }
}

impl fmt::Display for Action {
    /// Canonical string form used as a policy-table key:
    /// `"row,col:seat"` for placements, `"col:seat"` for drops.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Target::Cell { row, col } => write!(f, "{row},{col}:{}", self.seat),
            Target::Drop { col } => write!(f, "{col}:{}", self.seat),
        }
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || crate::Error::ParseAction {
            input: s.to_string(),
        };
        let (target_part, seat_part) = s.trim().rsplit_once(':').ok_or_else(bad)?;
        let seat: Seat = seat_part.parse()?;

        let target = if let Some((row_part, col_part)) = target_part.split_once(',') {
            Target::Cell {
                row: row_part.trim().parse().map_err(|_| bad())?,
                col: col_part.trim().parse().map_err(|_| bad())?,
            }
        } else {
            Target::Drop {
                col: target_part.trim().parse().map_err(|_| bad())?,
            }
        };

        Ok(Action { target, seat })
    }
}

/// Win check result, from the perspective the board is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinStatus {
    /// The viewing player has a qualifying win line.
    Won,
    /// The opponent has a qualifying win line.
    Lost,
    /// Neither side has won.
    Open,
}

/// Terminal-state classification, from the viewing player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    SelfWin,
    OpponentWin,
    Draw,
    Ongoing,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Ongoing
    }
}

/// Immediate win-completing targets for both sides of a board.
///
/// Each target, if played, finishes a qualifying win line for that side.
/// Powers the default win-if-possible / block-if-possible strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    pub own: Vec<Target>,
    pub opp: Vec<Target>,
}

/// The rules engine contract.
///
/// Every board argument is expressed from the acting player's perspective.
/// Illegal actions and invalid resulting states are sentinel outcomes
/// (`false` / `None`), never errors: search and learning treat them as
/// branches that do not exist.
pub trait World: Send + Sync {
    fn kind(&self) -> GameKind;

    fn shape(&self) -> Shape;

    /// All syntactically possible actions for a seat, independent of any
    /// particular board.
    fn actions(&self, seat: Seat) -> Vec<Action>;

    /// Whether an action is structurally possible on this board.
    fn is_legal(&self, board: &Board, action: Action) -> bool;

    /// Global invariant oracle for a *resulting* board.
    ///
    /// No move history exists; validity must be re-derived purely from the
    /// static board, for the given mover having just played.
    fn is_valid(&self, board: &Board, seat: Seat) -> bool;

    /// Scan all win-relevant lines and report from the viewer's side.
    fn winner(&self, board: &Board) -> WinStatus;

    /// Apply an action, returning the encoded resulting board, or `None`
    /// when the action is illegal or the result invalid.
    fn next_state(&self, board: &Board, action: Action) -> Option<BoardCode>;

    /// Heuristic value of a board for the viewing player, given whether
    /// that player moves next.
    fn evaluate(&self, board: &Board, my_turn_next: bool) -> f64;

    /// Canonical start states for a seat: the empty board for seat 1, one
    /// opponent piece at every legal first move for seat 2.
    fn start_states(&self, seat: Seat) -> Vec<BoardCode>;

    /// Immediate win-completing targets for both sides.
    fn completions(&self, board: &Board) -> Completions;

    /// Classify a board as won, lost, drawn, or still in play.
    fn game_over(&self, board: &Board) -> GameStatus {
        match self.winner(board) {
            WinStatus::Won => GameStatus::SelfWin,
            WinStatus::Lost => GameStatus::OpponentWin,
            WinStatus::Open => {
                if board.count(Cell::Empty) == 0 {
                    GameStatus::Draw
                } else {
                    GameStatus::Ongoing
                }
            }
        }
    }

    /// Every (resulting state, action) pair reachable by the seat through a
    /// legal action with a valid result.
    fn next_states(&self, board: &Board, seat: Seat) -> Vec<(BoardCode, Action)> {
        self.actions(seat)
            .into_iter()
            .filter_map(|action| self.next_state(board, action).map(|code| (code, action)))
            .collect()
    }

    /// Reward for executing an action: the value of the resulting state, or
    /// [`ILLEGAL_MOVE_REWARD`] when the action is illegal or the result
    /// invalid.
    fn reward(&self, board: &Board, action: Action) -> f64 {
        if !self.is_legal(board, action) {
            return ILLEGAL_MOVE_REWARD;
        }
        match self.next_state(board, action) {
            Some(code) => self.evaluate(&code.decode(self.shape()), false),
            None => ILLEGAL_MOVE_REWARD,
        }
    }
}

/// Construct the world for a game kind.
pub fn world_for(kind: GameKind) -> Box<dyn World> {
    match kind {
        GameKind::TicTacToe => Box::new(TicTacToe),
        GameKind::ConnectFour => Box::new(ConnectFour),
    }
}
