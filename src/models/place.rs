// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Serialization models shared by the backend, the client and the picker

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Identifier of a place in the catalog (e.g. "p1")
pub type PlaceId = String;

/// Upper bound on how many places a user may keep selected
pub const MAX_SELECTION: usize = 100;

/// A place the user can pick
/// DOCUMENTATION: Immutable record coming from the static catalog or GET /places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier
    pub id: PlaceId,

    /// Display name
    pub title: String,

    /// Image shown next to the place
    pub image: PlaceImage,

    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lon: f64,
}

/// Image reference for a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceImage {
    /// Asset file name or URL
    pub src: String,
    /// Alternative text
    pub alt: String,
}

/// Body of GET /places
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}

/// Body of GET /user-places
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlacesResponse {
    pub places: Vec<PlaceId>,
}

/// Request DTO for PUT /user-places
/// DOCUMENTATION: Ordered selection, most recently picked first
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserPlacesRequest {
    #[validate(custom = "validate_selection_size")]
    pub places: Vec<PlaceId>,
}

fn validate_selection_size(places: &[PlaceId]) -> Result<(), ValidationError> {
    if places.len() > MAX_SELECTION {
        return Err(ValidationError::new("too_many_places"));
    }
    Ok(())
}

/// Acknowledgement returned by PUT /user-places
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserPlacesResponse {
    pub message: String,
}

impl UpdateUserPlacesRequest {
    /// Returns the first id that appears more than once, if any
    pub fn first_duplicate(&self) -> Option<&str> {
        self.places
            .iter()
            .enumerate()
            .find(|(i, id)| self.places[..*i].contains(*id))
            .map(|(_, id)| id.as_str())
    }
}
