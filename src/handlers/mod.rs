// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod health;
pub mod places;
pub mod state;
pub mod user_places;

pub use health::config as health_config;
pub use places::config as places_config;
pub use state::{AppState, USER_PLACES_KEY};
pub use user_places::config as user_places_config;
