//! # Easel API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, http::header, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::error::route_not_found;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Easel API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;
    let upload_dir = config.upload_dir.clone();
    let cors_origin = config.cors_origin.clone();

    #[cfg(feature = "rate-limit")]
    let limiter: std::sync::Arc<dyn easel_core::ports::RateLimiter> =
        std::sync::Arc::new(easel_infra::InMemoryRateLimiter::from_env());

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION]);

        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .service(Files::new("/uploads", upload_dir.clone()))
            .default_service(web::to(route_not_found));

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(middleware::rate_limit::RateLimitMiddleware::new(
            limiter.clone(),
        ));

        app.wrap(cors)
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
    })
    .client_request_timeout(config.request_timeout)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
