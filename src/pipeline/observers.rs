//! Observers for play sessions: progress bars, metrics, CSV records, and
//! verbose board printing.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::{
    Result,
    board::Board,
    pipeline::stats::{GameRecord, SessionStats},
    ports::Observer,
    types::Seat,
    world::Action,
};

/// Progress bar observer showing games played and the running score.
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: [usize; 2],
    draws: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        ProgressObserver {
            progress_bar: None,
            wins: [0, 0],
            draws: 0,
        }
    }

    fn score_message(&self) -> String {
        format!("1:{} 2:{} D:{}", self.wins[0], self.wins[1], self.draws)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_session_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        match record.winner {
            Some(seat) => self.wins[seat.index()] += 1,
            None => self.draws += 1,
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(record.game_num as u64 + 1);
            pb.set_message(self.score_message());
        }
        Ok(())
    }

    fn on_session_end(&mut self, _stats: &SessionStats) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.score_message());
        }
        Ok(())
    }
}

/// Metrics observer accumulating a session summary.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    game_lengths: Vec<usize>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn avg_game_length(&self) -> f64 {
        if self.game_lengths.is_empty() {
            0.0
        } else {
            self.game_lengths.iter().sum::<usize>() as f64 / self.game_lengths.len() as f64
        }
    }
}

impl Observer for MetricsObserver {
    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        self.game_lengths.push(record.total_moves());
        Ok(())
    }
}

/// One CSV row per finished game.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    session_id: &'a str,
    game: &'a str,
    player1: &'a str,
    player2: &'a str,
    game_num: usize,
    /// 1, 2, or 0 for a draw.
    winner: u8,
    moves_player1: usize,
    moves_player2: usize,
    avg_move_ms_player1: f64,
    avg_move_ms_player2: f64,
    total_ms: f64,
}

/// Appends one row per game to a CSV file, writing the header only when
/// the file is created fresh.
pub struct CsvObserver {
    path: PathBuf,
    session_id: String,
    game: String,
    player1: String,
    player2: String,
}

impl CsvObserver {
    pub fn new(
        path: &Path,
        session_id: impl Into<String>,
        game: impl Into<String>,
        player1: impl Into<String>,
        player2: impl Into<String>,
    ) -> Self {
        CsvObserver {
            path: path.to_path_buf(),
            session_id: session_id.into(),
            game: game.into(),
            player1: player1.into(),
            player2: player2.into(),
        }
    }
}

impl Observer for CsvObserver {
    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        let fresh = !self.path.exists();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| crate::Error::Io {
                operation: format!("append to CSV file {}", self.path.display()),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(fresh)
            .from_writer(file);
        writer.serialize(CsvRow {
            session_id: &self.session_id,
            game: &self.game,
            player1: &self.player1,
            player2: &self.player2,
            game_num: record.game_num,
            winner: record.winner.map_or(0, Seat::number),
            moves_player1: record.moves[0],
            moves_player2: record.moves[1],
            avg_move_ms_player1: record.avg_move_millis[0],
            avg_move_ms_player2: record.avg_move_millis[1],
            total_ms: record.total_millis,
        })?;
        writer.flush().map_err(|source| crate::Error::Io {
            operation: format!("flush CSV file {}", self.path.display()),
            source,
        })?;
        Ok(())
    }
}

/// Prints every board in the real players' symbols as moves happen.
#[derive(Debug, Default)]
pub struct PrintObserver;

impl PrintObserver {
    pub fn new() -> Self {
        Self
    }

    /// Render a relative board in fixed X/O symbols given whose
    /// perspective it is expressed in.
    fn world_view(board: &Board, perspective: Seat) -> String {
        let mut out = String::new();
        let shape = board.shape();
        for row in 0..shape.rows {
            for col in 0..shape.cols {
                let c = match board.get(row, col) {
                    crate::board::Cell::Empty => '.',
                    crate::board::Cell::Own => perspective.symbol(),
                    crate::board::Cell::Opp => perspective.opponent().symbol(),
                };
                out.push(c);
                if col + 1 < shape.cols {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Observer for PrintObserver {
    fn on_game_start(&mut self, game_num: usize) -> Result<()> {
        println!("--- game {} ---", game_num + 1);
        Ok(())
    }

    fn on_move(
        &mut self,
        _game_num: usize,
        step_num: usize,
        mover: Seat,
        action: Action,
        board_after: &Board,
        to_move: Seat,
    ) -> Result<()> {
        println!("move {step_num}: seat {mover} played {action}");
        print!("{}", Self::world_view(board_after, to_move));
        Ok(())
    }

    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        match record.winner {
            Some(seat) => println!("seat {seat} wins in {} moves", record.total_moves()),
            None => println!("draw after {} moves", record.total_moves()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn record(game_num: usize, winner: Option<Seat>) -> GameRecord {
        GameRecord {
            game_num,
            winner,
            moves: [3, 2],
            avg_move_millis: [0.1, 0.2],
            total_millis: 4.2,
        }
    }

    #[test]
    fn test_metrics_average_length() {
        let mut metrics = MetricsObserver::new();
        metrics.on_game_end(&record(0, Some(Seat::One))).unwrap();
        metrics.on_game_end(&record(1, None)).unwrap();
        assert!((metrics.avg_game_length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_csv_appends_with_single_header() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("games.csv");
        let mut observer = CsvObserver::new(&path, "s1", "ttt", "random", "heuristic");

        observer.on_game_end(&record(0, Some(Seat::One))).unwrap();
        observer.on_game_end(&record(1, None)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("session_id,game,player1,player2"));
        assert!(lines[1].contains(",1,"));
        assert!(lines[2].contains("s1"));
    }

    #[test]
    fn test_world_view_uses_fixed_symbols() {
        use crate::board::{Cell, Shape};
        // Seat 2's perspective: own pieces render as O.
        let board = Board::empty(Shape::TIC_TAC_TOE)
            .with_cell(0, 0, Cell::Own)
            .with_cell(1, 1, Cell::Opp);
        let view = PrintObserver::world_view(&board, Seat::Two);
        assert!(view.starts_with("O . ."));
        assert!(view.contains(". X ."));
    }
}
