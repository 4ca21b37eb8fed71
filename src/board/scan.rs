//! Streak scanning along board lines.
//!
//! The scanner extracts the row, column, diagonal, or anti-diagonal line
//! through a pivot cell and reports every maximal same-symbol run of length
//! two or more, annotated with the adjacent cells a player could fill to
//! extend the run. Win detection, heuristic evaluation, and threat
//! enumeration are all built on these reports.

use serde::{Deserialize, Serialize};

use super::{Board, Cell};

/// One of the four line directions through a pivot cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Row,
    Col,
    Diag,
    AntiDiag,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Row,
    Direction::Col,
    Direction::Diag,
    Direction::AntiDiag,
];

impl Direction {
    /// Step from one line cell to the next, in scan order.
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Row => (0, 1),
            Direction::Col => (1, 0),
            Direction::Diag => (1, 1),
            Direction::AntiDiag => (1, -1),
        }
    }
}

/// A maximal run of one symbol along a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streak {
    pub direction: Direction,
    pub symbol: Cell,
    /// First cell of the run in scan order.
    pub start: (usize, usize),
    /// Last cell of the run in scan order.
    pub end: (usize, usize),
    pub len: usize,
    /// Empty, playable cells one step beyond either end of the run.
    pub open_ends: Vec<(usize, usize)>,
}

/// Streaks found through one pivot, grouped by symbol.
#[derive(Debug, Clone, Default)]
pub struct StreakReport {
    pub own: Vec<Streak>,
    pub opp: Vec<Streak>,
}

impl StreakReport {
    pub fn merge(&mut self, other: StreakReport) {
        self.own.extend(other.own);
        self.opp.extend(other.opp);
    }

    fn push(&mut self, streak: Streak) {
        match streak.symbol {
            Cell::Own => self.own.push(streak),
            Cell::Opp => self.opp.push(streak),
            Cell::Empty => {}
        }
    }
}

/// The ordered cells of the line through `(pivot_row, pivot_col)` in the
/// given direction. Rows and columns span the whole board; diagonals extend
/// maximally in both directions from the pivot.
pub fn line_through(
    board: &Board,
    pivot_row: usize,
    pivot_col: usize,
    direction: Direction,
) -> Vec<(usize, usize)> {
    let shape = board.shape();
    let (dr, dc) = direction.step();

    // Walk backward from the pivot to the first in-bounds cell of the line.
    let mut row = pivot_row as isize;
    let mut col = pivot_col as isize;
    match direction {
        Direction::Row => col = 0,
        Direction::Col => row = 0,
        Direction::Diag | Direction::AntiDiag => {
            while shape.contains(row - dr, col - dc) {
                row -= dr;
                col -= dc;
            }
        }
    }

    let mut cells = Vec::new();
    while shape.contains(row, col) {
        cells.push((row as usize, col as usize));
        row += dr;
        col += dc;
    }
    cells
}

/// Whether an empty cell is a legal placement target.
///
/// Under gravity this requires the cell below to be occupied (or the cell
/// to sit on the bottom row); without gravity every empty cell qualifies.
fn is_playable(board: &Board, row: usize, col: usize, gravity: bool) -> bool {
    if board.get(row, col) != Cell::Empty {
        return false;
    }
    if !gravity {
        return true;
    }
    let below = row + 1;
    below >= board.shape().rows || board.get(below, col) != Cell::Empty
}

/// Empty, playable cells one step beyond each end of a run.
fn playable_adjacent(
    board: &Board,
    start: (usize, usize),
    end: (usize, usize),
    direction: Direction,
    gravity: bool,
) -> Vec<(usize, usize)> {
    let shape = board.shape();
    let (dr, dc) = direction.step();
    let mut found = Vec::new();

    let before = (start.0 as isize - dr, start.1 as isize - dc);
    if shape.contains(before.0, before.1) {
        let (row, col) = (before.0 as usize, before.1 as usize);
        if is_playable(board, row, col, gravity) {
            found.push((row, col));
        }
    }

    let after = (end.0 as isize + dr, end.1 as isize + dc);
    if shape.contains(after.0, after.1) {
        let (row, col) = (after.0 as usize, after.1 as usize);
        if is_playable(board, row, col, gravity) {
            found.push((row, col));
        }
    }

    found
}

/// Scan the lines through a pivot and report all streaks of length >= 2.
///
/// Two run accumulators (one per symbol) advance along each line; a run
/// ends when its symbol breaks (other symbol or empty cell) and is then
/// reported with its playable open ends. Runs still open at the end of the
/// line are flushed as well.
pub fn scan(
    board: &Board,
    pivot_row: usize,
    pivot_col: usize,
    directions: &[Direction],
    gravity: bool,
) -> StreakReport {
    let mut report = StreakReport::default();

    for &direction in directions {
        let mut own_run: Option<((usize, usize), (usize, usize), usize)> = None;
        let mut opp_run: Option<((usize, usize), (usize, usize), usize)> = None;

        let flush = |run: &mut Option<((usize, usize), (usize, usize), usize)>,
                         symbol: Cell,
                         report: &mut StreakReport| {
            if let Some((start, end, len)) = run.take()
                && len >= 2
            {
                report.push(Streak {
                    direction,
                    symbol,
                    start,
                    end,
                    len,
                    open_ends: playable_adjacent(board, start, end, direction, gravity),
                });
            }
        };

        for pos in line_through(board, pivot_row, pivot_col, direction) {
            match board.get(pos.0, pos.1) {
                Cell::Own => {
                    match &mut own_run {
                        Some((_, end, len)) => {
                            *end = pos;
                            *len += 1;
                        }
                        None => own_run = Some((pos, pos, 1)),
                    }
                    flush(&mut opp_run, Cell::Opp, &mut report);
                }
                Cell::Opp => {
                    match &mut opp_run {
                        Some((_, end, len)) => {
                            *end = pos;
                            *len += 1;
                        }
                        None => opp_run = Some((pos, pos, 1)),
                    }
                    flush(&mut own_run, Cell::Own, &mut report);
                }
                Cell::Empty => {
                    flush(&mut own_run, Cell::Own, &mut report);
                    flush(&mut opp_run, Cell::Opp, &mut report);
                }
            }
        }

        flush(&mut own_run, Cell::Own, &mut report);
        flush(&mut opp_run, Cell::Opp, &mut report);
    }

    report
}

/// Completing cells for a gapped ("broken") threat.
///
/// For each end of the run, the cell one step beyond must be empty and
/// playable while the cell two steps beyond still holds the run's symbol;
/// filling the gap then connects the two fragments (patterns like
/// `X _ X X`).
pub fn gap_completions(board: &Board, streak: &Streak, gravity: bool) -> Vec<(usize, usize)> {
    let shape = board.shape();
    let (dr, dc) = streak.direction.step();
    let mut found = Vec::new();

    let ends = [
        (streak.start, (-dr, -dc)),
        (streak.end, (dr, dc)),
    ];
    for (anchor, (sr, sc)) in ends {
        let gap = (anchor.0 as isize + sr, anchor.1 as isize + sc);
        let beyond = (gap.0 + sr, gap.1 + sc);
        if !shape.contains(gap.0, gap.1) || !shape.contains(beyond.0, beyond.1) {
            continue;
        }
        let gap = (gap.0 as usize, gap.1 as usize);
        let beyond = (beyond.0 as usize, beyond.1 as usize);
        if is_playable(board, gap.0, gap.1, gravity)
            && board.get(beyond.0, beyond.1) == streak.symbol
        {
            found.push(gap);
        }
    }

    found
}
