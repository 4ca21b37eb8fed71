//! Per-game and per-session bookkeeping.

use serde::{Deserialize, Serialize};

use crate::types::Seat;

/// Outcome and timing of one finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_num: usize,
    /// Winning seat, or `None` for a draw.
    pub winner: Option<Seat>,
    /// Moves made, indexed by seat.
    pub moves: [usize; 2],
    /// Mean move-selection time per seat, in milliseconds.
    pub avg_move_millis: [f64; 2],
    /// Wall-clock duration of the whole game, in milliseconds.
    pub total_millis: f64,
}

impl GameRecord {
    pub fn total_moves(&self) -> usize {
        self.moves[0] + self.moves[1]
    }
}

/// Aggregates over a session of games.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub games: usize,
    /// Wins, indexed by seat.
    pub wins: [usize; 2],
    pub draws: usize,
    pub total_moves: usize,
    pub avg_game_millis: f64,
}

impl SessionStats {
    pub fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        match record.winner {
            Some(seat) => self.wins[seat.index()] += 1,
            None => self.draws += 1,
        }
        self.total_moves += record.total_moves();
        // Running mean over game durations.
        let n = self.games as f64;
        self.avg_game_millis += (record.total_millis - self.avg_game_millis) / n;
    }

    pub fn win_rate(&self, seat: Seat) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins[seat.index()] as f64 / self.games as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_num: usize, winner: Option<Seat>, millis: f64) -> GameRecord {
        GameRecord {
            game_num,
            winner,
            moves: [3, 2],
            avg_move_millis: [0.5, 0.4],
            total_millis: millis,
        }
    }

    #[test]
    fn test_session_aggregation() {
        let mut stats = SessionStats::default();
        stats.record(&record(0, Some(Seat::One), 10.0));
        stats.record(&record(1, Some(Seat::Two), 20.0));
        stats.record(&record(2, None, 30.0));

        assert_eq!(stats.games, 3);
        assert_eq!(stats.wins, [1, 1]);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.total_moves, 15);
        assert!((stats.avg_game_millis - 20.0).abs() < 1e-9);
        assert!((stats.win_rate(Seat::One) - 1.0 / 3.0).abs() < 1e-9);
    }
}
