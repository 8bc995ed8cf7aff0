// src/main.rs
// DOCUMENTATION: Backend entry point
// PURPOSE: Initialize config, load the catalog and serve the places REST endpoints

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use place_picker::config::Config;
use place_picker::handlers::{self, AppState, USER_PLACES_KEY};
use place_picker::services::{Catalog, SelectionStore};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting place-picker backend...");
    log::info!("Environment: {}", config.environment);

    // 4. Load catalog and the stored user selection
    let catalog = match Catalog::from_path_or_builtin(&config.places_data_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Failed to load place catalog: {}", e);
            std::process::exit(1);
        }
    };
    let store = SelectionStore::new(config.user_places_path.clone(), USER_PLACES_KEY);
    let state = web::Data::new(AppState::new(catalog, store));

    // 5. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    log::info!("Listening on {}", server_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .configure(handlers::health_config)
            .configure(handlers::places_config)
            .configure(handlers::user_places_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
