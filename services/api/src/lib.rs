pub mod config;
pub mod error;
pub mod handlers;
pub mod holdings;
pub mod lookthrough;
pub mod middleware;
pub mod models;
pub mod registry;

use actix_web::web;

use config::Config;
use error::ApiError;
use registry::SessionRegistries;

pub struct AppState {
    pub sessions: SessionRegistries,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: SessionRegistries::new(),
            config,
        }
    }
}

/// Routes plus the extractor limits they depend on.
pub fn configure_routes(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.app_data(web::PayloadConfig::new(config.ingest.max_document_bytes))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::BadRequest(format!("Invalid JSON body: {}", err)).into()
        }))
        .route("/health", web::get().to(handlers::health::handler))
        .service(
            web::scope("/api/v1")
                .route("/baskets", web::get().to(handlers::holdings::list))
                .route(
                    "/baskets/{basket_id}/holdings",
                    web::put().to(handlers::holdings::ingest),
                )
                .route(
                    "/baskets/{basket_id}/holdings",
                    web::get().to(handlers::holdings::show),
                )
                .route("/decompose", web::post().to(handlers::decompose::handler)),
        );
}
