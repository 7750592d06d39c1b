// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::flight_service::FlightService;
use crate::infrastructure::config::{load_app_config, load_influx_config};
use crate::infrastructure::influx_repository::InfluxRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, list_flights, object_trajectory, process_flight, scan_flight,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;
    let influx_config = load_influx_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(InfluxRepository::new(influx_config.influx));

    // Create services (application layer)
    let flight_service = FlightService::new(
        repository,
        app_config.camera.default_fov_degrees,
        app_config.matching.duration_tolerance_ms,
    );

    // Create application state
    let state = Arc::new(AppState { flight_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/flights", get(list_flights))
        .route("/flights/process", post(process_flight))
        .route("/flights/scan", post(scan_flight))
        .route(
            "/flights/:flight/videos/:video/trajectory/:tid",
            get(object_trajectory),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config.server.listen.parse()?;
    println!("Starting drone-fusion service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
