// src/handlers/state.rs
// DOCUMENTATION: Shared state of the places backend
// PURPOSE: Catalog plus the user's selection, kept in memory and mirrored to disk

use crate::errors::PlacesError;
use crate::models::PlaceId;
use crate::services::{Catalog, SelectionStore};
use tokio::sync::RwLock;

/// Entry of the user-places file that holds the selected ids
pub const USER_PLACES_KEY: &str = "places";

/// State injected into every handler through web::Data
pub struct AppState {
    pub catalog: Catalog,
    store: SelectionStore,
    user_places: RwLock<Vec<PlaceId>>,
}

impl AppState {
    /// Build state, loading any previously saved selection from `store`
    pub fn new(catalog: Catalog, store: SelectionStore) -> Self {
        let user_places = match store.load() {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!(
                    "Could not read user places from {}: {}",
                    store.path().display(),
                    e
                );
                Vec::new()
            }
        };

        log::info!(
            "Backend state ready: {} places, {} selected",
            catalog.len(),
            user_places.len()
        );

        Self {
            catalog,
            store,
            user_places: RwLock::new(user_places),
        }
    }

    pub async fn user_places(&self) -> Vec<PlaceId> {
        self.user_places.read().await.clone()
    }

    /// Replace the selection and persist it
    pub async fn replace_user_places(&self, ids: Vec<PlaceId>) -> Result<(), PlacesError> {
        let mut current = self.user_places.write().await;
        self.store.save(&ids)?;
        *current = ids;
        Ok(())
    }
}
