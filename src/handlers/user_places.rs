// src/handlers/user_places.rs
// DOCUMENTATION: HTTP handlers for the user's selected places
// PURPOSE: Read and replace the ordered selection kept by the backend

use crate::errors::PlacesError;
use crate::handlers::AppState;
use crate::models::{UpdateUserPlacesRequest, UpdateUserPlacesResponse, UserPlacesResponse};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// GET /user-places
pub async fn get_user_places(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(UserPlacesResponse {
        places: state.user_places().await,
    })
}

/// PUT /user-places
/// Replace the selection; every id must exist in the catalog and appear once
pub async fn update_user_places(
    state: web::Data<AppState>,
    req: web::Json<UpdateUserPlacesRequest>,
) -> Result<impl Responder, PlacesError> {
    if let Err(e) = req.validate() {
        return Err(PlacesError::ValidationError(e.to_string()));
    }

    if let Some(id) = req.first_duplicate() {
        return Err(PlacesError::ValidationError(format!(
            "Place selected more than once: {}",
            id
        )));
    }

    if let Some(id) = req.places.iter().find(|id| !state.catalog.contains(id)) {
        return Err(PlacesError::ValidationError(format!("Unknown place: {}", id)));
    }

    let ids = req.into_inner().places;
    log::info!("Updating user places: {} selected", ids.len());
    state.replace_user_places(ids).await?;

    Ok(HttpResponse::Ok().json(UpdateUserPlacesResponse {
        message: "User places updated!".to_string(),
    }))
}

/// Configuration for user place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/user-places")
            .route(web::get().to(get_user_places))
            .route(web::put().to(update_user_places)),
    );
}
