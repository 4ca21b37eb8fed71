//! The Connect-4 world: 6x7 board, gravity drops, four in a row wins.

use crate::{
    board::{Board, BoardCode, Cell, Direction, Shape, StreakReport, scan},
    types::{GameKind, Seat},
    world::{Action, Completions, Target, WinStatus, World},
};

/// Win threshold: four in a row.
const WIN_LEN: usize = 4;

/// Pivot column for the row/diagonal sweep. Every row, every diagonal of
/// length four or more, and every anti-diagonal of length four or more
/// crosses this column exactly once, so sweeping it covers each
/// win-relevant line exactly once.
const PIVOT_COL: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectFour;

impl ConnectFour {
    /// Collect every streak on the board: rows, diagonals, and
    /// anti-diagonals via the pivot-column sweep, columns via the top-row
    /// sweep.
    fn sweep(board: &Board) -> StreakReport {
        let shape = board.shape();
        let mut report = StreakReport::default();
        for row in 0..shape.rows {
            report.merge(scan::scan(
                board,
                row,
                PIVOT_COL,
                &[Direction::Row, Direction::Diag, Direction::AntiDiag],
                true,
            ));
        }
        for col in 0..shape.cols {
            report.merge(scan::scan(board, 0, col, &[Direction::Col], true));
        }
        report
    }

    /// Lowest empty row of a column, if the column is not full.
    fn drop_row(board: &Board, col: usize) -> Option<usize> {
        (0..board.shape().rows)
            .rev()
            .find(|&row| board.is_empty_at(row, col))
    }

    /// Cells which, if filled, complete four for the streak's owner:
    /// the playable open ends of three-streaks plus the gap cells of
    /// broken two-streaks.
    fn connecting_cells(board: &Board, streaks: &[crate::board::Streak]) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for streak in streaks {
            match streak.len {
                3 => cells.extend(streak.open_ends.iter().copied()),
                2 => cells.extend(scan::gap_completions(board, streak, true)),
                _ => {}
            }
        }
        cells
    }

    /// Number of distinct streaks that are one playable move away from
    /// becoming four.
    fn threat_count(board: &Board, streaks: &[crate::board::Streak]) -> usize {
        streaks
            .iter()
            .filter(|streak| match streak.len {
                3 => !streak.open_ends.is_empty(),
                2 => !scan::gap_completions(board, streak, true).is_empty(),
                _ => false,
            })
            .count()
    }

    /// Row-parity plausibility: pieces can only sit on rows their mover
    /// could have reached through column drops.
    ///
    /// Counting rows from the top of a six-row board, the first mover's
    /// pieces on even rows need one of their own pieces somewhere below,
    /// and the second mover's pieces on odd rows need a second-mover piece
    /// below (or, on the bottom row itself, a first-mover piece beside
    /// them, since the second mover never owns the very first drop).
    fn row_parity_ok(board: &Board, seat: Seat) -> bool {
        let shape = board.shape();
        let first_sym = match seat {
            Seat::One => Cell::Own,
            Seat::Two => Cell::Opp,
        };
        let second_sym = first_sym.flipped();

        for row in (0..shape.rows).step_by(2) {
            if board.row_contains(row, first_sym) && !board.below_contains(row, first_sym) {
                return false;
            }
        }
        for row in (1..shape.rows).step_by(2) {
            if board.row_contains(row, second_sym) {
                let plausible = if row == shape.rows - 1 {
                    board.row_contains(row, first_sym)
                } else {
                    board.below_contains(row, second_sym)
                };
                if !plausible {
                    return false;
                }
            }
        }
        true
    }
}

impl World for ConnectFour {
    fn kind(&self) -> GameKind {
        GameKind::ConnectFour
    }

    fn shape(&self) -> Shape {
        Shape::CONNECT_FOUR
    }

    fn actions(&self, seat: Seat) -> Vec<Action> {
        (0..self.shape().cols)
            .map(|col| Action::drop(col, seat))
            .collect()
    }

    fn is_legal(&self, board: &Board, action: Action) -> bool {
        match action.target {
            // A column exists and is not already full at its top cell.
            Target::Drop { col } => col < board.shape().cols && board.is_empty_at(0, col),
            Target::Cell { .. } => false,
        }
    }

    fn is_valid(&self, board: &Board, seat: Seat) -> bool {
        let own = board.count(Cell::Own);
        let opp = board.count(Cell::Opp);

        if own.abs_diff(opp) > 1 {
            return false;
        }
        match seat {
            Seat::One if opp > own => return false,
            Seat::Two if own > opp => return false,
            _ => {}
        }

        // Gravity: no empty cell below an occupied one.
        let shape = board.shape();
        for col in 0..shape.cols {
            let mut seen_piece = false;
            for row in 0..shape.rows {
                if !board.is_empty_at(row, col) {
                    seen_piece = true;
                } else if seen_piece {
                    return false;
                }
            }
        }

        let report = Self::sweep(board);
        let own_win = report.own.iter().any(|s| s.len >= WIN_LEN);
        let opp_win = report.opp.iter().any(|s| s.len >= WIN_LEN);

        if own_win && opp_win {
            return false;
        }
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

        Self::row_parity_ok(board, seat)
    }

    fn winner(&self, board: &Board) -> WinStatus {
        let report = Self::sweep(board);
        if report.opp.iter().any(|s| s.len >= WIN_LEN) {
            WinStatus::Lost
        } else if report.own.iter().any(|s| s.len >= WIN_LEN) {
            WinStatus::Won
        } else {
            WinStatus::Open
        }
    }

    fn next_state(&self, board: &Board, action: Action) -> Option<BoardCode> {
        if !self.is_legal(board, action) {
            return None;
        }
        let Target::Drop { col } = action.target else {
            return None;
        };
        let row = Self::drop_row(board, col)?;
        let next = board.with_cell(row, col, Cell::Own);
        if !self.is_valid(&next, action.seat) {
            return None;
        }
        Some(next.encode())
    }

    fn evaluate(&self, board: &Board, my_turn_next: bool) -> f64 {
        let report = Self::sweep(board);

        if report.own.iter().any(|s| s.len >= WIN_LEN) {
            return 100.0;
        }
        if report.opp.iter().any(|s| s.len >= WIN_LEN) {
            return -100.0;
        }

        // Threats one playable move away from connecting four, per side.
        let own_threats = Self::threat_count(board, &report.own);
        let opp_threats = Self::threat_count(board, &report.opp);

        if my_turn_next {
            if own_threats > 0 {
                50.0
            } else if opp_threats > 1 {
                -50.0
            } else if opp_threats == 1 {
                10.0
            } else {
                1.0
            }
        } else if opp_threats > 0 {
            -50.0
        } else if own_threats > 1 {
            10.0 * own_threats as f64
        } else {
            0.0
        }
    }

    fn start_states(&self, seat: Seat) -> Vec<BoardCode> {
        let shape = self.shape();
        match seat {
            Seat::One => vec![Board::empty(shape).encode()],
            Seat::Two => {
                // One first-mover piece on the bottom row of each column.
                let empty = Board::empty(shape);
                (0..shape.cols)
                    .map(|col| empty.with_cell(shape.rows - 1, col, Cell::Opp).encode())
                    .collect()
            }
        }
    }

    fn completions(&self, board: &Board) -> Completions {
        let report = Self::sweep(board);
        let to_targets = |cells: Vec<(usize, usize)>| {
            let mut targets = Vec::new();
            for (_, col) in cells {
                let target = Target::Drop { col };
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
            targets
        };
        Completions {
            own: to_targets(Self::connecting_cells(board, &report.own)),
            opp: to_targets(Self::connecting_cells(board, &report.opp)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GameStatus;

    fn board(text: &str) -> Board {
        Board::from_text(Shape::CONNECT_FOUR, text).unwrap()
    }

    #[test]
    fn test_actions_are_columns() {
        let world = ConnectFour;
        let actions = world.actions(Seat::One);
        assert_eq!(actions.len(), 7);
        assert_eq!(actions[0], Action::drop(0, Seat::One));
        assert_eq!(actions[6], Action::drop(6, Seat::One));
    }

    #[test]
    fn test_full_column_is_illegal() {
        let world = ConnectFour;
        let b = board("..X.... ..O.... ..X.... ..O.... ..X.... ..O....");
        assert!(!world.is_legal(&b, Action::drop(2, Seat::One)));
        assert!(!world.is_legal(&b, Action::drop(2, Seat::Two)));
        assert!(world.is_legal(&b, Action::drop(0, Seat::One)));
        assert!(!world.is_legal(&b, Action::drop(7, Seat::One)));
    }

    #[test]
    fn test_drop_lands_on_lowest_empty_row() {
        let world = ConnectFour;
        // The canonical second-mover start: responding on top of the
        // opener's piece.
        let b = board("....... ....... ....... ....... ....... ...O...");
        let code = world
            .next_state(&b, Action::drop(3, Seat::Two))
            .expect("column 3 has room");
        let next = code.decode(Shape::CONNECT_FOUR);
        assert_eq!(next.get(4, 3), Cell::Own);
        assert_eq!(next.get(5, 3), Cell::Opp);
    }

    #[test]
    fn test_next_state_sentinel_on_full_column() {
        let world = ConnectFour;
        let b = board("..X.... ..O.... ..X.... ..O.... ..X.... ..O....");
        assert_eq!(world.next_state(&b, Action::drop(2, Seat::One)), None);
    }

    #[test]
    fn test_column_win_found_from_any_pivot_sweep() {
        let world = ConnectFour;
        // Four own pieces stacked in column 5.
        let b = board("....... ....... .....X. .....X. .....XO .....XO");
        assert_eq!(world.winner(&b), WinStatus::Won);
        assert_eq!(world.game_over(&b), GameStatus::SelfWin);
    }

    #[test]
    fn test_row_and_diagonal_wins() {
        let world = ConnectFour;
        let row_win = board("....... ....... ....... ....... OO.O... XXXX...");
        assert_eq!(world.winner(&row_win), WinStatus::Won);

        let diag_win = board("....... ....... X...... OX..O.. OXX.O.. XOXX...");
        assert_eq!(world.winner(&diag_win), WinStatus::Won);

        let opp_win = board("....... ....... ....... ...O... ..OX.X. .OXXXO.");
        // Opponent anti-diagonal of three is no win yet.
        assert_eq!(world.winner(&opp_win), WinStatus::Open);
    }

    #[test]
    fn test_opponent_win_reports_lost() {
        let world = ConnectFour;
        let b = board("....... ....... ....... ....... XXX.... OOOO...");
        assert_eq!(world.winner(&b), WinStatus::Lost);
        assert_eq!(world.game_over(&b), GameStatus::OpponentWin);
    }

    #[test]
    fn test_validity_rejects_floating_pieces() {
        let world = ConnectFour;
        let b = board("....... ....... ....... ...X... ....... ...O...");
        assert!(!world.is_valid(&b, Seat::One));
    }

    #[test]
    fn test_validity_rejects_double_win() {
        let world = ConnectFour;
        let b = board("....... ....... ....... ....... XXXX... OOOO...");
        assert!(!world.is_valid(&b, Seat::One));
    }

    #[test]
    fn test_validity_accepts_played_positions() {
        let world = ConnectFour;
        // Seat 1 just made the fifth move.
        let b = board("....... ....... ....... ....... ...X... ..OXO.X");
        assert!(world.is_valid(&b, Seat::One));
    }

    #[test]
    fn test_validity_win_count_consistency() {
        let world = ConnectFour;
        // Own four with equal counts cannot come from the first mover.
        let b = board("....... ....... ..X.... ..X..O. ..X..O. ..X.OO.");
        assert_eq!(b.count(Cell::Own), 4);
        assert_eq!(b.count(Cell::Opp), 4);
        assert!(!world.is_valid(&b, Seat::One));
        assert!(world.is_valid(&b, Seat::Two));
    }

    #[test]
    fn test_row_parity_rejects_impossible_layers() {
        let world = ConnectFour;
        // One own piece sitting on one opponent piece: impossible when the
        // viewer opened, fine when the viewer moved second.
        let b = board("....... ....... ....... ....... X...... O......");
        assert!(!world.is_valid(&b, Seat::One));
        assert!(world.is_valid(&b, Seat::Two));
    }

    #[test]
    fn test_evaluate_extremes() {
        let world = ConnectFour;
        let won = board("....... ....... ....... ....... OO.O... XXXX...");
        assert_eq!(world.evaluate(&won, false), 100.0);

        let lost = board("....... ....... ....... ....... XXX.... OOOO...");
        assert_eq!(world.evaluate(&lost, true), -100.0);
    }

    #[test]
    fn test_evaluate_decision_table() {
        let world = ConnectFour;

        // Own open three, mover to act: winning move available.
        let own_three = board("....... ....... ....... ....... OO..... XXX.O..");
        assert_eq!(world.evaluate(&own_three, true), 50.0);
        // Same board, opponent to act: a single own threat is not a pair,
        // no opponent threat, falls through to zero.
        assert_eq!(world.evaluate(&own_three, false), 0.0);

        // Opponent open three when they act next is a loss in waiting.
        let opp_three = board("....... ....... ....... ....... XX..... OOO.X..");
        assert_eq!(world.evaluate(&opp_three, false), -50.0);
        // Mover to act can block the single threat.
        assert_eq!(world.evaluate(&opp_three, true), 10.0);

        // Quiet position: mover to act scores the baseline one.
        let quiet = board("....... ....... ....... ....... ....... X.O....");
        assert_eq!(world.evaluate(&quiet, true), 1.0);
        assert_eq!(world.evaluate(&quiet, false), 0.0);
    }

    #[test]
    fn test_evaluate_broken_threat_counts() {
        let world = ConnectFour;
        // X X . X on the bottom row: a broken three, completable at the
        // gap, counts as an own threat.
        let b = board("....... ....... ....... ....... ....... XX.XOO.");
        assert_eq!(world.evaluate(&b, true), 50.0);
    }

    #[test]
    fn test_start_states() {
        let world = ConnectFour;
        assert_eq!(world.start_states(Seat::One).len(), 1);

        let second = world.start_states(Seat::Two);
        assert_eq!(second.len(), 7);
        for (col, code) in second.iter().enumerate() {
            let b = code.decode(Shape::CONNECT_FOUR);
            assert_eq!(b.count(Cell::Opp), 1);
            assert_eq!(b.get(5, col), Cell::Opp);
        }
    }

    #[test]
    fn test_completions_find_wins_and_blocks() {
        let world = ConnectFour;
        let b = board("....... ....... ....... ....... OO..... XXX.O..");
        let found = world.completions(&b);
        assert!(found.own.contains(&Target::Drop { col: 3 }));
        assert!(!found.opp.contains(&Target::Drop { col: 3 }));
    }

    #[test]
    fn test_completions_include_gap_cells() {
        let world = ConnectFour;
        let b = board("....... ....... ....... ....... ....... XX.XOO.");
        let found = world.completions(&b);
        assert!(found.own.contains(&Target::Drop { col: 2 }));
    }
}
