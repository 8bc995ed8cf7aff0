// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Report that the backend is up and how much data it serves

use crate::handlers::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "places": state.catalog.len(),
        "selected": state.user_places().await.len()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
