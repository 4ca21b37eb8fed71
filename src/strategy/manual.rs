//! Manual input: a human (or any line-based source) chooses the moves.

use std::io::{BufRead, Write};

use crate::{
    Result,
    board::Board,
    ports::Strategy,
    types::{GameKind, Seat},
    world::{Action, World},
};

/// Reads actions from a line-based input source.
///
/// Tic-Tac-Toe expects `row col` on one line; Connect-4 expects a single
/// column index. Unreadable input is an error; an illegal-but-parseable
/// move is passed through and rejected by the match loop like any other
/// unplayable action.
pub struct ManualStrategy {
    input: Box<dyn BufRead + Send>,
    prompt: bool,
}

impl ManualStrategy {
    /// Interactive instance reading from stdin with a prompt.
    pub fn stdin() -> Self {
        ManualStrategy {
            input: Box::new(std::io::BufReader::new(std::io::stdin())),
            prompt: true,
        }
    }

    /// Scripted instance reading from any buffered source, promptless.
    /// Used by tests and replays.
    pub fn from_reader(input: Box<dyn BufRead + Send>) -> Self {
        ManualStrategy {
            input,
            prompt: false,
        }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| crate::Error::Io {
                operation: "read manual move".to_string(),
                source,
            })?;
        if read == 0 {
            return Err(crate::Error::ManualInput {
                message: "input closed before a move was entered".to_string(),
            });
        }
        Ok(line)
    }
}

impl Strategy for ManualStrategy {
    fn select_move(&mut self, world: &dyn World, board: &Board, seat: Seat) -> Result<Action> {
        if self.prompt {
            println!("{board}");
            match world.kind() {
                GameKind::TicTacToe => print!("seat {seat}, enter row and column: "),
                GameKind::ConnectFour => print!("seat {seat}, enter column: "),
            }
            let _ = std::io::stdout().flush();
        }

        let line = self.read_line()?;
        let mut numbers = line.split_whitespace().map(str::parse::<usize>);

        let parse_error = || crate::Error::ManualInput {
            message: format!("could not parse move from '{}'", line.trim()),
        };

        let action = match world.kind() {
            GameKind::TicTacToe => {
                let row = numbers.next().ok_or_else(parse_error)?.map_err(|_| parse_error())?;
                let col = numbers.next().ok_or_else(parse_error)?.map_err(|_| parse_error())?;
                Action::place(row, col, seat)
            }
            GameKind::ConnectFour => {
                let col = numbers.next().ok_or_else(parse_error)?.map_err(|_| parse_error())?;
                Action::drop(col, seat)
            }
        };

        if numbers.next().is_some() {
            return Err(parse_error());
        }
        Ok(action)
    }

    fn name(&self) -> &str {
        "manual"
    }
}
