//! JSON implementation of the policy repository.
//!
//! The file shape is a triple-nested object:
//!
//! ```json
//! {
//!   "1": { "<board code>": { "<action>": 0.45, ... }, ... },
//!   "2": { ... }
//! }
//! ```
//!
//! Seats key the outer object, decimal board codes the middle one, and
//! canonical action strings the inner one, since JSON objects cannot key
//! on tuples. Round-trips are lossless for all keys and values.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::{
    Result,
    board::BoardCode,
    error::Error,
    learn::QTable,
    ports::PolicyRepository,
    types::Seat,
    world::Action,
};

/// JSON-backed policy storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPolicyRepository;

impl JsonPolicyRepository {
    pub fn new() -> Self {
        Self
    }

    /// Reject paths without a `.json` extension before touching the disk.
    fn check_extension(path: &Path) -> Result<()> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(()),
            _ => Err(Error::PolicyFileExtension {
                path: path.display().to_string(),
            }),
        }
    }
}

type FileShape = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

impl PolicyRepository for JsonPolicyRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        Self::check_extension(path)?;

        let mut shape = FileShape::new();
        for seat in [Seat::One, Seat::Two] {
            let mut states = BTreeMap::new();
            for (code, actions) in table.entries(seat) {
                let mut by_action = BTreeMap::new();
                for (action, &value) in actions {
                    by_action.insert(action.to_string(), value);
                }
                states.insert(code.to_string(), by_action);
            }
            shape.insert(seat.to_string(), states);
        }

        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create policy file {}", path.display()),
            source,
        })?;
        serde_json::to_writer(BufWriter::new(file), &shape)?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<QTable> {
        Self::check_extension(path)?;

        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open policy file {}", path.display()),
            source,
        })?;
        let shape: FileShape =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::PolicyFileFormat {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        // Validate and convert everything before returning, so a malformed
        // file never yields a half-populated table.
        let bad_key = |message: String| Error::PolicyFileFormat {
            path: path.display().to_string(),
            message,
        };

        let mut table = QTable::default();
        for (seat_key, states) in shape {
            let seat: Seat = seat_key
                .parse()
                .map_err(|_| bad_key(format!("unknown seat key '{seat_key}'")))?;
            for (code_key, actions) in states {
                let code: BoardCode = code_key
                    .parse()
                    .map_err(|_| bad_key(format!("unparseable board code '{code_key}'")))?;
                for (action_key, value) in actions {
                    let action: Action = action_key
                        .parse()
                        .map_err(|_| bad_key(format!("unparseable action '{action_key}'")))?;
                    table.set(seat, code, action, value);
                }
            }
        }

        Ok(table)
    }
}
