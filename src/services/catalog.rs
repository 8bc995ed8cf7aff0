// src/services/catalog.rs
// DOCUMENTATION: Static place catalog
// PURPOSE: The fixed list of places the user can browse and pick from

use crate::errors::PlacesError;
use crate::models::Place;
use std::path::Path;

const BUILTIN_PLACES: &str = include_str!("../../data/places.json");

/// Immutable list of known places
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    places: Vec<Place>,
}

impl Catalog {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Catalog bundled into the binary
    pub fn builtin() -> Result<Self, PlacesError> {
        let places: Vec<Place> = serde_json::from_str(BUILTIN_PLACES)?;
        Ok(Self::new(places))
    }

    /// Load a catalog from a JSON array of places
    pub fn from_path(path: &Path) -> Result<Self, PlacesError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PlacesError::StorageError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let places: Vec<Place> = serde_json::from_str(&raw)?;
        log::info!("Loaded {} places from {}", places.len(), path.display());
        Ok(Self::new(places))
    }

    /// Load from `path`, falling back to the bundled catalog when the file is missing
    pub fn from_path_or_builtin(path: &Path) -> Result<Self, PlacesError> {
        if path.exists() {
            Self::from_path(path)
        } else {
            log::warn!(
                "Catalog file {} not found, using bundled places",
                path.display()
            );
            Self::builtin()
        }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn find(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
