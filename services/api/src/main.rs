use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use lookthrough_api::config::Config;
use lookthrough_api::middleware::create_logger;
use lookthrough_api::{configure_routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lookthrough_api=info,actix_web=info")),
        )
        .init();

    let config = Config::from_env();

    tracing::info!(
        "Starting look-through API on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("Max document size: {} bytes", config.ingest.max_document_bytes);
    tracing::info!("Default session: {}", config.session.default_session);

    // Holdings live for the lifetime of the process only
    let state = web::Data::new(AppState::new(config.clone()));

    let host = config.server.host.clone();
    let port = config.server.port;

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(config.cors.max_age_seconds);

        App::new()
            .app_data(state.clone())
            .wrap(create_logger())
            .wrap(cors)
            .configure(|cfg| configure_routes(cfg, &config))
    })
    .bind((host, port))?
    .run()
    .await
}
