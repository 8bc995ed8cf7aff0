// src/services/places_client.rs
// DOCUMENTATION: Places backend client
// PURPOSE: Handle communication with the places REST backend (listing and user selection)

use crate::config::Config;
use crate::errors::PlacesError;
use crate::models::{
    Place, PlaceId, PlacesResponse, UpdateUserPlacesRequest, UpdateUserPlacesResponse,
    UserPlacesResponse,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Operations the picker needs from the places backend
/// DOCUMENTATION: Implemented by PlacesClient over HTTP; tests provide in-memory versions
pub trait PlacesApi: Send + Sync + 'static {
    /// All places offered by the backend
    fn list_places(&self) -> impl Future<Output = Result<Vec<Place>, PlacesError>> + Send;

    /// Replace the user's selection, returning the backend acknowledgement
    fn update_user_places(
        &self,
        ids: Vec<PlaceId>,
    ) -> impl Future<Output = Result<String, PlacesError>> + Send;
}

/// HTTP client for the places backend
pub struct PlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Backend root, without trailing slash (e.g. "http://localhost:3000")
    base_url: String,
}

impl PlacesClient {
    /// Create a client with a request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PlacesError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            PlacesError::ExternalApiError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PlacesError> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /places
    /// DOCUMENTATION: Non-success status becomes "Failed to fetch places"
    pub async fn fetch_available_places(&self) -> Result<Vec<Place>, PlacesError> {
        let url = format!("{}/places", self.base_url);
        log::debug!("Fetching available places: {}", url);

        let response = self.send(self.client.get(&url)).await?;
        let body: PlacesResponse = Self::decode(response, "Failed to fetch places").await?;

        log::info!("Places backend returned {} places", body.places.len());
        Ok(body.places)
    }

    /// GET /user-places
    pub async fn fetch_user_places(&self) -> Result<Vec<PlaceId>, PlacesError> {
        let url = format!("{}/user-places", self.base_url);

        let response = self.send(self.client.get(&url)).await?;
        let body: UserPlacesResponse =
            Self::decode(response, "Failed to fetch user places").await?;
        Ok(body.places)
    }

    /// PUT /user-places
    /// DOCUMENTATION: Sends `{"places": [ids]}` and returns the `message` acknowledgement.
    /// Non-success status becomes "Failed to update places"
    pub async fn update_places(&self, ids: Vec<PlaceId>) -> Result<String, PlacesError> {
        let url = format!("{}/user-places", self.base_url);
        log::debug!("Updating user places ({} selected)", ids.len());

        let payload = UpdateUserPlacesRequest { places: ids };
        let response = self.send(self.client.put(&url).json(&payload)).await?;
        let body: UpdateUserPlacesResponse =
            Self::decode(response, "Failed to update places").await?;

        log::info!("User places updated: {}", body.message);
        Ok(body.message)
    }

    /// GET /health
    pub async fn check_health(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                log::debug!("Health check failed: {}", e);
                false
            }
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, PlacesError> {
        request.send().await.map_err(|e| {
            log::error!("Places backend request failed: {}", e);
            PlacesError::ExternalApiError(format!("Request failed: {}", e))
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        failure_message: &str,
    ) -> Result<T, PlacesError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Places backend error {}: {}", status, body);
            return Err(PlacesError::RemoteStatus {
                status: status.as_u16(),
                message: failure_message.to_string(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            log::error!("Failed to parse places backend response: {}", e);
            PlacesError::ExternalApiError(format!("Parse error: {}", e))
        })
    }
}

impl PlacesApi for PlacesClient {
    async fn list_places(&self) -> Result<Vec<Place>, PlacesError> {
        self.fetch_available_places().await
    }

    async fn update_user_places(&self, ids: Vec<PlaceId>) -> Result<String, PlacesError> {
        self.update_places(ids).await
    }
}
