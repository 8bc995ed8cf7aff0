// src/handlers/places.rs
// DOCUMENTATION: HTTP handler for the place listing
// PURPOSE: Serve the catalog to the picker

use crate::handlers::AppState;
use crate::models::PlacesResponse;
use actix_web::{web, HttpResponse, Responder};

/// GET /places
/// List every place the user can pick
pub async fn list_places(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(PlacesResponse {
        places: state.catalog.places().to_vec(),
    })
}

/// Configuration for place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/places", web::get().to(list_places));
}
