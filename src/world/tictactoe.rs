//! The Tic-Tac-Toe world: 3x3 board, three in a row wins.

use crate::{
    board::{Board, BoardCode, Cell, Direction, Shape, scan},
    types::{GameKind, Seat},
    world::{Action, Completions, Target, WinStatus, World},
};

/// The eight win lines as cell triples: rows, then diagonal, then columns,
/// then anti-diagonal. The order matters for evaluation, which scores the
/// lines in exactly this sequence.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Win threshold: three in a row.
const WIN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Score one line for the viewing player from its occupancy counts.
    ///
    /// Produces values in -3..=4: 4 for a completed own line, -3 for a
    /// completed opponent line, and for open lines the count-based score
    /// `(own + 1) - (ideal_free - free)` where `ideal_free` is the number
    /// of empty cells a pure own line would still need.
    fn line_value(board: &Board, line: &[(usize, usize); 3]) -> i32 {
        let mut own = 0i32;
        let mut opp = 0i32;
        let mut free = 0i32;
        for &(row, col) in line {
            match board.get(row, col) {
                Cell::Own => own += 1,
                Cell::Opp => opp += 1,
                Cell::Empty => free += 1,
            }
        }

        let ideal_free = 3 - own;
        let mut value = 0;
        if own == 3 {
            value += 4;
        }
        if free > 0 {
            value += (own + 1) - (ideal_free - free);
        }
        if opp == 3 {
            value -= 3;
        }
        value
    }

    /// Whether the given symbol has a completed line, checked economically
    /// through the center pivot (all four directions) plus corner-anchored
    /// row/column scans.
    fn has_win(board: &Board, symbol: Cell) -> bool {
        let sweeps = [
            scan::scan(board, 1, 1, &scan::ALL_DIRECTIONS, false),
            scan::scan(board, 0, 0, &[Direction::Row, Direction::Col], false),
            scan::scan(board, 2, 2, &[Direction::Row, Direction::Col], false),
        ];
        sweeps.iter().any(|report| {
            let streaks = match symbol {
                Cell::Own => &report.own,
                Cell::Opp => &report.opp,
                Cell::Empty => return false,
            };
            streaks.iter().any(|s| s.len >= WIN_LEN)
        })
    }

    /// Empty cells that would complete a line for the symbol: exactly two
    /// symbol cells and one empty cell in the line.
    fn winning_cells(board: &Board, symbol: Cell) -> Vec<Target> {
        let mut targets = Vec::new();
        for line in &LINES {
            let mut count = 0;
            let mut empty = None;
            for &(row, col) in line {
                match board.get(row, col) {
                    c if c == symbol => count += 1,
                    Cell::Empty => empty = Some((row, col)),
                    _ => {}
                }
            }
            if count == 2
                && let Some((row, col)) = empty
                && !targets.contains(&Target::Cell { row, col })
            {
                targets.push(Target::Cell { row, col });
            }
        }
        targets
    }
}

impl World for TicTacToe {
    fn kind(&self) -> GameKind {
        GameKind::TicTacToe
    }

    fn shape(&self) -> Shape {
        Shape::TIC_TAC_TOE
    }

    fn actions(&self, seat: Seat) -> Vec<Action> {
        let mut actions = Vec::with_capacity(9);
        for row in 0..3 {
            for col in 0..3 {
                actions.push(Action::place(row, col, seat));
            }
        }
        actions
    }

    fn is_legal(&self, board: &Board, action: Action) -> bool {
        match action.target {
            Target::Cell { row, col } => row < 3 && col < 3 && board.is_empty_at(row, col),
            Target::Drop { .. } => false,
        }
    }

    fn is_valid(&self, board: &Board, seat: Seat) -> bool {
        let own = board.count(Cell::Own);
        let opp = board.count(Cell::Opp);

        // Piece counts may differ by at most one, and only the first mover
        // may be ahead.
        if own.abs_diff(opp) > 1 {
            return false;
        }
        match seat {
            Seat::One if opp > own => return false,
            Seat::Two if own > opp => return false,
            _ => {}
        }

        let own_win = Self::has_win(board, Cell::Own);
        let opp_win = Self::has_win(board, Cell::Opp);

        // Both sides cannot hold a win simultaneously.
        if own_win && opp_win {
            return false;
        }

        // A winner must have just moved, so their count reflects it.
        if own_win {
            let expected = match seat {
                Seat::One => own == opp + 1,
                Seat::Two => own == opp,
            };
            if !expected {
                return false;
            }
        }
        if opp_win {
            let expected = match seat {
                Seat::One => opp == own,
                Seat::Two => opp == own + 1,
            };
            if !expected {
                return false;
            }
        }

        true
    }

    fn winner(&self, board: &Board) -> WinStatus {
        if Self::has_win(board, Cell::Opp) {
            WinStatus::Lost
        } else if Self::has_win(board, Cell::Own) {
            WinStatus::Won
        } else {
            WinStatus::Open
        }
    }

    fn next_state(&self, board: &Board, action: Action) -> Option<BoardCode> {
        if !self.is_legal(board, action) {
            return None;
        }
        let Target::Cell { row, col } = action.target else {
            return None;
        };
        let next = board.with_cell(row, col, Cell::Own);
        if !self.is_valid(&next, action.seat) {
            return None;
        }
        Some(next.encode())
    }

    fn evaluate(&self, board: &Board, my_turn_next: bool) -> f64 {
        let values: Vec<i32> = LINES
            .iter()
            .map(|line| Self::line_value(board, line))
            .collect();

        let count = |v: i32| values.iter().filter(|&&x| x == v).count();
        let mean = || values.iter().sum::<i32>() as f64 / values.len() as f64;

        if values.contains(&4) {
            10.0
        } else if values.contains(&-3) {
            -10.0
        } else if my_turn_next {
            if values.contains(&3) {
                5.0
            } else if values.contains(&-1) {
                if count(-1) == 1 { 1.0 } else { -5.0 }
            } else {
                mean()
            }
        } else if values.contains(&-1) {
            -5.0
        } else if values.contains(&3) {
            if count(3) == 1 { 0.0 } else { 5.0 }
        } else {
            mean()
        }
    }

    fn start_states(&self, seat: Seat) -> Vec<BoardCode> {
        match seat {
            Seat::One => vec![Board::empty(self.shape()).encode()],
            Seat::Two => {
                let empty = Board::empty(self.shape());
                let mut states = Vec::with_capacity(9);
                for row in 0..3 {
                    for col in 0..3 {
                        states.push(empty.with_cell(row, col, Cell::Opp).encode());
                    }
                }
                states
            }
        }
    }

    fn completions(&self, board: &Board) -> Completions {
        Completions {
            own: Self::winning_cells(board, Cell::Own),
            opp: Self::winning_cells(board, Cell::Opp),
        }
    }
}
