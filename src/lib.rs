//! # PlacePicker
//!
//! Browse a fixed list of places, pick favorites and keep the selection both
//! locally and on the places backend.
//!
//! - `services::fetch` - observable pending/error/data container around one async fetch
//! - `services::picker` - selection state and the view the console renders
//! - `services::places_client` - HTTP client for `GET /places` and `PUT /user-places`
//! - `handlers` - the actix-web backend serving those endpoints

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
