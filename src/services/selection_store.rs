// src/services/selection_store.rs
// DOCUMENTATION: Local persisted selection
// PURPOSE: Keyed JSON file holding the user's selected place ids between runs

use crate::errors::PlacesError;
use crate::models::PlaceId;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// File-backed key/value store for the selection
/// DOCUMENTATION: The file is a JSON object of keyed entries. The entry under
/// `key` is the ordered list of selected ids. Other entries are preserved on save.
/// Load once at startup, save on every change.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
    key: String,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored selection
    /// DOCUMENTATION: A missing file or entry yields an empty selection.
    /// An entry that is not a list of strings is ignored with a warning.
    pub fn load(&self) -> Result<Vec<PlaceId>, PlacesError> {
        let entries = match self.read_entries()? {
            Some(entries) => entries,
            None => return Ok(Vec::new()),
        };

        let Some(entry) = entries.get(&self.key) else {
            return Ok(Vec::new());
        };

        match serde_json::from_value::<Vec<PlaceId>>(entry.clone()) {
            Ok(ids) => {
                log::debug!("Loaded {} selected places from {}", ids.len(), self.path.display());
                Ok(ids)
            }
            Err(e) => {
                log::warn!(
                    "Ignoring malformed selection entry '{}' in {}: {}",
                    self.key,
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Write the selection under the store key
    pub fn save(&self, ids: &[PlaceId]) -> Result<(), PlacesError> {
        let mut entries = match self.read_entries() {
            Ok(Some(entries)) => entries,
            Ok(None) => Map::new(),
            Err(e) => {
                log::warn!("Overwriting unreadable store {}: {}", self.path.display(), e);
                Map::new()
            }
        };

        entries.insert(self.key.clone(), serde_json::to_value(ids)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write to a sibling file first so a crash never leaves half a document
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&Value::Object(entries))?)?;
        std::fs::rename(&tmp, &self.path)?;

        log::debug!("Saved {} selected places to {}", ids.len(), self.path.display());
        Ok(())
    }

    fn read_entries(&self) -> Result<Option<Map<String, Value>>, PlacesError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(PlacesError::StorageError(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }
}
