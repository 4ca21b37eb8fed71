//! Repository port - persistence boundary for learned policies.

use std::path::Path;

use crate::{Result, learn::QTable};

/// Persistent storage for Q-tables.
///
/// Implementations must fail fast on malformed input: a load either returns
/// a fully reconstructed table or an error, never a partially populated
/// one.
pub trait PolicyRepository {
    /// Save a Q-table to the given path.
    fn save(&self, table: &QTable, path: &Path) -> Result<()>;

    /// Load a Q-table from the given path.
    fn load(&self, path: &Path) -> Result<QTable>;
}
