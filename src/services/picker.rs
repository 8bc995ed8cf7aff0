// src/services/picker.rs
// DOCUMENTATION: Application shell of the place picker
// PURPOSE: Own the user's selection, compose remote places with the catalog, expose a view

use crate::errors::PlacesError;
use crate::models::{Place, PlaceId};
use crate::services::distance::sort_places_by_distance;
use crate::services::fetch::{FetchState, Fetcher};
use crate::services::{Catalog, PlacesApi, SelectionStore};
use std::sync::Arc;

/// Message used when a selection update fails without a reason
pub const DEFAULT_UPDATE_ERROR: &str = "Failed to update places.";

/// Result of a selection mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Nothing to do (already picked, nothing pending, ...)
    Unchanged,
    /// Applied locally and acknowledged by the backend
    Saved,
    /// Backend refused; the previous selection was restored
    RolledBack,
}

/// Everything a view needs to render the picker
#[derive(Debug, Clone, PartialEq)]
pub struct PickerView {
    /// Selected places, most recent first
    pub picked: Vec<Place>,
    /// Places offered for picking
    pub available: Vec<Place>,
    /// Remote listing in flight
    pub loading: bool,
    /// Failure of the last listing attempt
    pub load_error: Option<String>,
    /// Removal confirmation is showing
    pub confirm_open: bool,
    pub pending_removal: Option<PlaceId>,
    /// Failure of the last selection update
    pub update_error: Option<String>,
}

/// Selection state plus the remote listing
/// DOCUMENTATION: The selection is loaded from the store once, at construction.
/// Every accepted change is saved to the store and sent to the backend; when the
/// backend refuses, both are restored to the previous selection.
pub struct PlacePicker<A: PlacesApi> {
    api: Arc<A>,
    catalog: Catalog,
    store: SelectionStore,
    available: Fetcher<u64, Vec<Place>>,
    revision: u64,
    sorted_catalog: Option<Vec<Place>>,
    picked: Vec<Place>,
    pending_removal: Option<PlaceId>,
    confirm_open: bool,
    update_error: Option<String>,
}

impl<A: PlacesApi> PlacePicker<A> {
    pub fn new(catalog: Catalog, store: SelectionStore, api: Arc<A>) -> Self {
        let stored = store.load().unwrap_or_else(|e| {
            log::warn!("Starting with an empty selection: {}", e);
            Vec::new()
        });

        let picked: Vec<Place> = stored
            .iter()
            .filter_map(|id| {
                let place = catalog.find(id).cloned();
                if place.is_none() {
                    log::warn!("Dropping stored selection of unknown place {}", id);
                }
                place
            })
            .collect();

        log::info!("Restored {} selected places", picked.len());

        Self {
            api,
            catalog,
            store,
            available: Fetcher::new(Vec::new()),
            revision: 0,
            sorted_catalog: None,
            picked,
            pending_removal: None,
            confirm_open: false,
            update_error: None,
        }
    }

    /// Fetch the remote listing once per revision
    /// DOCUMENTATION: Repeated calls are no-ops until reload_available bumps the revision
    pub fn load_available(&mut self) -> bool {
        let api = Arc::clone(&self.api);
        self.available
            .use_fetch(self.revision, move || async move { api.list_places().await })
    }

    /// Fetch the remote listing again
    pub fn reload_available(&mut self) -> bool {
        self.revision += 1;
        self.load_available()
    }

    /// Wait for the remote listing to settle
    pub async fn available_settled(&self) -> FetchState<Vec<Place>> {
        self.available.settled().await
    }

    /// Sort the catalog by distance from the user's position and keep that listing
    pub fn locate(&mut self, lat: f64, lon: f64) {
        log::info!("Location set to {:.4},{:.4}", lat, lon);
        self.sorted_catalog = Some(sort_places_by_distance(self.catalog.places(), lat, lon));
    }

    /// Remote places when loaded, otherwise the sorted catalog, otherwise the catalog
    pub fn available(&self) -> Vec<Place> {
        let fetched = self.available.state().data;
        if !fetched.is_empty() {
            return fetched;
        }

        match &self.sorted_catalog {
            Some(sorted) => sorted.clone(),
            None => self.catalog.places().to_vec(),
        }
    }

    pub fn picked(&self) -> &[Place] {
        &self.picked
    }

    pub fn picked_ids(&self) -> Vec<PlaceId> {
        self.picked.iter().map(|p| p.id.clone()).collect()
    }

    /// Add a place to the front of the selection
    pub async fn select_place(&mut self, id: &str) -> Result<SelectionChange, PlacesError> {
        if self.picked.iter().any(|p| p.id == id) {
            return Ok(SelectionChange::Unchanged);
        }

        let place = self
            .lookup(id)
            .ok_or_else(|| PlacesError::NotFound(id.to_string()))?;

        let previous = self.picked.clone();
        self.picked.insert(0, place);
        Ok(self.commit(previous).await)
    }

    /// Ask for confirmation before removing `id`
    pub fn start_remove(&mut self, id: &str) -> bool {
        if !self.picked.iter().any(|p| p.id == id) {
            return false;
        }
        self.pending_removal = Some(id.to_string());
        self.confirm_open = true;
        true
    }

    /// Dismiss the confirmation without removing anything
    pub fn stop_remove(&mut self) {
        self.confirm_open = false;
        self.pending_removal = None;
    }

    /// Remove the place waiting for confirmation
    pub async fn confirm_remove(&mut self) -> SelectionChange {
        self.confirm_open = false;
        let Some(id) = self.pending_removal.take() else {
            return SelectionChange::Unchanged;
        };

        let previous = self.picked.clone();
        self.picked.retain(|p| p.id != id);
        if self.picked.len() == previous.len() {
            return SelectionChange::Unchanged;
        }

        self.commit(previous).await
    }

    pub fn dismiss_update_error(&mut self) {
        self.update_error = None;
    }

    pub fn view(&self) -> PickerView {
        let state = self.available.state();
        PickerView {
            picked: self.picked.clone(),
            available: self.available(),
            loading: state.pending,
            load_error: state.error.map(|e| e.message),
            confirm_open: self.confirm_open,
            pending_removal: self.pending_removal.clone(),
            update_error: self.update_error.clone(),
        }
    }

    fn lookup(&self, id: &str) -> Option<Place> {
        self.catalog.find(id).cloned().or_else(|| {
            self.available
                .state()
                .data
                .into_iter()
                .find(|p| p.id == id)
        })
    }

    /// Persist the current selection, restoring `previous` if the backend refuses
    async fn commit(&mut self, previous: Vec<Place>) -> SelectionChange {
        self.save_local();

        match self.api.update_user_places(self.picked_ids()).await {
            Ok(ack) => {
                log::debug!("Selection saved remotely: {}", ack);
                self.update_error = None;
                SelectionChange::Saved
            }
            Err(e) => {
                log::error!("Selection update failed, rolling back: {}", e);
                self.picked = previous;
                self.save_local();

                let message = e.to_string();
                self.update_error = Some(if message.trim().is_empty() {
                    DEFAULT_UPDATE_ERROR.to_string()
                } else {
                    message
                });
                SelectionChange::RolledBack
            }
        }
    }

    fn save_local(&self) {
        if let Err(e) = self.store.save(&self.picked_ids()) {
            log::warn!("Could not save selection locally: {}", e);
        }
    }
}
