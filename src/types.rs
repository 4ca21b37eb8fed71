//! Shared domain vocabulary: seats and game kinds.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the two real players: seat 1 moves first, seat 2 second.
///
/// Boards never record which seat a piece belongs to; they only record
/// "own" and "opponent" relative to a stated perspective. A `Seat` is the
/// missing half of that pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    /// Get the other seat.
    pub fn opponent(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// Whether this is the first mover.
    pub fn is_first(self) -> bool {
        self == Seat::One
    }

    /// Zero-based index, for seat-keyed arrays.
    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    /// Seat number as displayed (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }

    /// Conventional board symbol for this seat (X opens).
    pub fn symbol(self) -> char {
        match self {
            Seat::One => 'X',
            Seat::Two => 'O',
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for Seat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Seat::One),
            "2" => Ok(Seat::Two),
            other => Err(crate::Error::ParseSeat {
                input: other.to_string(),
            }),
        }
    }
}

/// Which of the two modeled games a world implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    TicTacToe,
    ConnectFour,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::TicTacToe => write!(f, "ttt"),
            GameKind::ConnectFour => write!(f, "connect4"),
        }
    }
}

impl FromStr for GameKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ttt" | "tictactoe" | "tic-tac-toe" => Ok(GameKind::TicTacToe),
            "con4" | "connect4" | "connect-4" => Ok(GameKind::ConnectFour),
            other => Err(crate::Error::ParseGameKind {
                input: other.to_string(),
            }),
        }
    }
}
