use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::PersistenceError;
use crate::algorithms::rl::q_table::QTable;
use crate::algorithms::rl::types::QKey;

/// Backing storage for a Q-table.
pub trait TableStore: Send {
    /// Loads the stored table. A store with nothing saved yet returns an
    /// empty table.
    fn load(&self) -> Result<QTable, PersistenceError>;

    /// Replaces the stored table wholesale.
    fn save(&mut self, table: &QTable) -> Result<(), PersistenceError>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}

/// Table stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, operation: &'static str, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }
}

impl TableStore for JsonFileStore {
    fn load(&self) -> Result<QTable, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved table, starting empty");
                return Ok(QTable::new());
            }
            Err(e) => return Err(self.io_error("read", e)),
        };
        let raw: BTreeMap<String, f64> = serde_json::from_str(&text)?;
        Ok(decode_table(&raw))
    }

    fn save(&mut self, table: &QTable) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(&encode_table(table))?;
        fs::write(&self.path, text).map_err(|e| self.io_error("write", e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Converts a table to its persisted key/value form.
///
/// A `BTreeMap` keeps the written file stable across runs.
pub fn encode_table(table: &QTable) -> BTreeMap<String, f64> {
    table.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Parses one persisted entry.
pub fn decode_entry(key: &str, value: f64) -> Result<(QKey, f64), PersistenceError> {
    Ok((key.parse::<QKey>()?, value))
}

/// Rebuilds a table from its persisted form, skipping malformed keys.
pub fn decode_table(raw: &BTreeMap<String, f64>) -> QTable {
    let mut skipped = 0usize;
    let table: QTable = raw
        .iter()
        .filter_map(|(k, &v)| match decode_entry(k, v) {
            Ok(entry) => Some(entry),
            Err(e) => {
                skipped += 1;
                debug!(error = %e, "skipping table entry");
                None
            }
        })
        .collect();
    if skipped > 0 {
        warn!(skipped, kept = raw.len() - skipped, "ignored malformed table keys");
    }
    table
}

/// Loads a table, falling back to an empty one on any failure.
pub fn load_or_empty(store: &dyn TableStore) -> QTable {
    match store.load() {
        Ok(table) => {
            debug!(store = %store.describe(), entries = table.len(), "loaded q-table");
            table
        }
        Err(e) => {
            warn!(store = %store.describe(), error = %e, "failed to load q-table, starting empty");
            QTable::new()
        }
    }
}

/// Saves a table, logging instead of propagating failures.
///
/// Returns whether the save succeeded.
pub fn save_best_effort(store: &mut dyn TableStore, table: &QTable) -> bool {
    match store.save(table) {
        Ok(()) => true,
        Err(e) => {
            warn!(store = %store.describe(), error = %e, "failed to save q-table");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::rl::types::StateKey;
    use crate::grid::{Action, Position};

    fn sample_table() -> QTable {
        let s = StateKey::new(Position::new(0, 0), Position::new(50, 50));
        let mut table = QTable::new();
        table.insert(QKey::new(s, Action::DownRight), 1.5);
        table.insert(QKey::new(s, Action::UpLeft), -2.25);
        table
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_restores_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("q.json"));
        let table = sample_table();
        store.save(&table).unwrap();
        assert_eq!(store.load().unwrap(), table);
    }

    #[test]
    fn written_file_uses_text_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        let mut store = JsonFileStore::new(&path);
        store.save(&sample_table()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"0,0,50,50-10-10\":1.5"));
        assert!(text.contains("\"0,0,50,50--10--10\":-2.25"));
    }

    #[test]
    fn malformed_file_is_an_error_but_load_or_empty_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(PersistenceError::Json(_))));
        assert!(load_or_empty(&store).is_empty());
    }

    #[test]
    fn malformed_keys_are_skipped() {
        let mut raw = BTreeMap::new();
        raw.insert("0,0,50,50-10-0".to_string(), 3.0);
        raw.insert("garbage".to_string(), 1.0);
        raw.insert("0,0,50,50-30-0".to_string(), 1.0);
        let table = decode_table(&raw);
        assert_eq!(table.len(), 1);
        let s = StateKey::new(Position::new(0, 0), Position::new(50, 50));
        assert_eq!(table.get(&s, Action::Right), Some(3.0));
    }

    #[test]
    fn save_to_missing_directory_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nope").join("q.json"));
        assert!(!save_best_effort(&mut store, &sample_table()));
    }
}
