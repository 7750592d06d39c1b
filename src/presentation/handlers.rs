// HTTP request handlers
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::error::FusionError;
use crate::domain::flight::FlightSession;
use crate::presentation::app_state::AppState;

#[derive(Deserialize)]
pub struct ProcessFlightRequest {
    pub name: String,
    pub description: Option<String>,
    pub log_path: String,
    pub video_paths: Vec<String>,
    pub tracking_paths: Vec<String>,
    pub camera_fov: Option<f64>,
}

#[derive(Deserialize)]
pub struct ScanFlightRequest {
    pub name: String,
    pub directory: String,
    pub camera_fov: Option<f64>,
}

#[derive(Serialize)]
pub struct TrajectoryResponse {
    pub tracking_id: i64,
    pub trajectory: Vec<crate::domain::flight::TrajectoryPoint>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Process one flight from explicitly listed file paths
pub async fn process_flight(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProcessFlightRequest>,
) -> impl IntoResponse {
    let session = FlightSession {
        name: request.name,
        description: request.description,
        log_path: request.log_path,
        video_paths: request.video_paths,
        tracking_paths: request.tracking_paths,
        camera_fov: request.camera_fov,
    };

    match state.flight_service.process_session(session).await {
        Ok(summary) => (StatusCode::OK, Json(json!({ "data": summary }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// Scan a directory for flight data and process what it finds
pub async fn scan_flight(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScanFlightRequest>,
) -> impl IntoResponse {
    let directory = PathBuf::from(request.directory);

    match state
        .flight_service
        .process_directory(request.name, &directory, request.camera_fov)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(json!({ "data": summary }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// List flight names known to the store
pub async fn list_flights(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.flight_service.list_flights().await {
        Ok(flights) => (StatusCode::OK, Json(json!({ "data": flights }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// Stored trajectory of one tracked object within one video
pub async fn object_trajectory(
    Path((flight, video, tracking_id)): Path<(String, String, i64)>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state
        .flight_service
        .object_trajectory(&flight, &video, tracking_id)
        .await
    {
        Ok(trajectory) if trajectory.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "no trajectory found for this tracking id in the specified video"
            })),
        )
            .into_response(),
        Ok(trajectory) => (
            StatusCode::OK,
            Json(json!({ "data": TrajectoryResponse { tracking_id, trajectory } })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Validation failures are the caller's fault; everything else is ours.
fn error_response(err: anyhow::Error) -> axum::response::Response {
    let status = match err.downcast_ref::<FusionError>() {
        Some(FusionError::Validation(_)) => StatusCode::BAD_REQUEST,
        Some(FusionError::Processing(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::error!("Request failed: {err:#}");
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
