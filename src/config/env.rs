// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Shared by the backend server and the picker console
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 3000)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// JSON file with the place catalog served by GET /places
    pub places_data_path: PathBuf,

    /// JSON file where the backend keeps the user's selected place ids
    pub user_places_path: PathBuf,

    /// Base URL of the places backend used by the picker
    pub api_base_url: String,

    /// Local selection store file used by the picker
    pub selection_store_path: PathBuf,

    /// Key of the selection entry inside the store file
    pub selection_storage_key: String,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 3000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            places_data_path: PathBuf::from("data/places.json"),
            user_places_path: PathBuf::from("data/user-places.json"),
            api_base_url: "http://localhost:3000".to_string(),
            selection_store_path: PathBuf::from("selection.json"),
            selection_storage_key: "selectedPlaces".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment, falling back to defaults
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Config::default();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address),

            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            places_data_path: env::var("PLACES_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.places_data_path),

            user_places_path: env::var("USER_PLACES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.user_places_path),

            api_base_url: env::var("PLACES_API_URL").unwrap_or(defaults.api_base_url),

            selection_store_path: env::var("SELECTION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.selection_store_path),

            selection_storage_key: env::var("SELECTION_STORAGE_KEY")
                .unwrap_or(defaults.selection_storage_key),

            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures the binaries can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.trim().is_empty() {
            return Err("PLACES_API_URL is required".to_string());
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(format!(
                "PLACES_API_URL must be an http(s) URL, got {}",
                self.api_base_url
            ));
        }

        if self.selection_storage_key.trim().is_empty() {
            return Err("SELECTION_STORAGE_KEY must not be empty".to_string());
        }

        if self.places_data_path.as_os_str().is_empty()
            || self.user_places_path.as_os_str().is_empty()
            || self.selection_store_path.as_os_str().is_empty()
        {
            return Err("Data and store paths must not be empty".to_string());
        }

        if self.request_timeout_secs == 0 {
            log::warn!("REQUEST_TIMEOUT_SECS is 0 - requests will fail immediately");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.selection_storage_key, "selectedPlaces");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config {
            api_base_url: "localhost:3000".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            api_base_url: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let config = Config {
            selection_storage_key: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
