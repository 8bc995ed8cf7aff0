// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod catalog;
pub mod distance;
pub mod fetch;
pub mod picker;
pub mod places_client;
pub mod selection_store;

pub use catalog::*;
pub use distance::*;
pub use fetch::*;
pub use picker::*;
pub use places_client::*;
pub use selection_store::*;
