//! Per-seat Q-value tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{board::BoardCode, types::Seat, world::Action};

/// Q-value estimates for both seats.
///
/// Each seat owns a mapping `state -> action -> value`. States are keyed by
/// their [`BoardCode`] in seat 1's frame regardless of which seat the table
/// belongs to. Entries are created lazily on first update and never
/// deleted. Unknown state-action pairs read as a configured baseline
/// rather than negative infinity, so unexplored territory stays attractive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    tables: [HashMap<BoardCode, HashMap<Action, f64>>; 2],
    unknown_value: f64,
}

impl Default for QTable {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl QTable {
    /// Create an empty table with the given unknown-pair baseline.
    pub fn new(unknown_value: f64) -> Self {
        QTable {
            tables: [HashMap::new(), HashMap::new()],
            unknown_value,
        }
    }

    pub fn unknown_value(&self) -> f64 {
        self.unknown_value
    }

    /// Q(s, a) for a seat, falling back to the unknown baseline when the
    /// state or the action has never been visited.
    pub fn get(&self, seat: Seat, state: BoardCode, action: Action) -> f64 {
        self.tables[seat.index()]
            .get(&state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(self.unknown_value)
    }

    /// Set Q(s, a), creating the state entry if absent.
    pub fn set(&mut self, seat: Seat, state: BoardCode, action: Action, value: f64) {
        self.tables[seat.index()]
            .entry(state)
            .or_default()
            .insert(action, value);
    }

    /// Whether any action has been recorded from this state.
    pub fn knows_state(&self, seat: Seat, state: BoardCode) -> bool {
        self.tables[seat.index()].contains_key(&state)
    }

    /// The recorded actions and values for a state, if any.
    pub fn known_actions(&self, seat: Seat, state: BoardCode) -> Option<&HashMap<Action, f64>> {
        self.tables[seat.index()].get(&state)
    }

    /// Best known Q-value over all recorded actions from a state; the
    /// unknown baseline when nothing is recorded.
    pub fn max_known(&self, seat: Seat, state: BoardCode) -> f64 {
        match self.tables[seat.index()].get(&state) {
            Some(actions) if !actions.is_empty() => {
                actions.values().copied().fold(f64::NEG_INFINITY, f64::max)
            }
            _ => self.unknown_value,
        }
    }

    /// Apply the Q-learning update
    /// `Q(s,a) <- (1 - alpha) Q(s,a) + alpha (r + gamma * max_next)`.
    pub fn apply_update(
        &mut self,
        seat: Seat,
        state: BoardCode,
        action: Action,
        reward: f64,
        max_next: f64,
        alpha: f64,
        gamma: f64,
    ) {
        let current = self.get(seat, state, action);
        let updated = (1.0 - alpha) * current + alpha * (reward + gamma * max_next);
        self.set(seat, state, action, updated);
    }

    /// Iterate a seat's recorded states.
    pub fn states(&self, seat: Seat) -> impl Iterator<Item = BoardCode> + '_ {
        self.tables[seat.index()].keys().copied()
    }

    /// Iterate a seat's full (state, actions) entries.
    pub fn entries(
        &self,
        seat: Seat,
    ) -> impl Iterator<Item = (&BoardCode, &HashMap<Action, f64>)> + '_ {
        self.tables[seat.index()].iter()
    }

    /// Number of recorded states for a seat.
    pub fn state_count(&self, seat: Seat) -> usize {
        self.tables[seat.index()].len()
    }

    /// Total number of recorded (seat, state, action) entries.
    pub fn entry_count(&self) -> usize {
        self.tables
            .iter()
            .map(|t| t.values().map(HashMap::len).sum::<usize>())
            .sum()
    }
}
