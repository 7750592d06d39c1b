// Flight service - Use case for processing one flight's telemetry and videos
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::application::fusion::run_fusion;
use crate::application::fusion_repository::FusionRepository;
use crate::application::segments::{detect_segments, match_segments, validate_duration};
use crate::domain::error::FusionError;
use crate::domain::flight::{FlightSession, ProcessSummary, TrajectoryPoint, VideoSummary};
use crate::domain::object::TrackingData;
use crate::domain::telemetry::{Segment, TelemetrySequence};
use crate::infrastructure::flight_log;
use crate::infrastructure::scanner;
use crate::infrastructure::tracking_file;

#[derive(Clone)]
pub struct FlightService {
    repository: Arc<dyn FusionRepository>,
    default_fov_degrees: f64,
    duration_tolerance_ms: i64,
}

impl FlightService {
    pub fn new(
        repository: Arc<dyn FusionRepository>,
        default_fov_degrees: f64,
        duration_tolerance_ms: i64,
    ) -> Self {
        Self {
            repository,
            default_fov_degrees,
            duration_tolerance_ms,
        }
    }

    /// Run the full pipeline for one flight: parse and validate the log,
    /// detect recording segments, match them to the session's videos, then
    /// fuse each video concurrently and persist the enriched records.
    pub async fn process_session(&self, session: FlightSession) -> anyhow::Result<ProcessSummary> {
        tracing::info!("Starting flight session processing: {}", session.name);

        if session.video_paths.len() != session.tracking_paths.len() {
            return Err(FusionError::validation(format!(
                "mismatch between number of videos ({}) and tracking files ({})",
                session.video_paths.len(),
                session.tracking_paths.len()
            ))
            .into());
        }

        let log_content = tokio::fs::read_to_string(&session.log_path)
            .await
            .with_context(|| format!("failed to read flight log {}", session.log_path))?;
        let sequence = flight_log::parse_flight_log(&log_content)?;

        let segments = detect_segments(sequence.samples());
        tracing::info!(
            "Parsed {} telemetry samples, found {} recording segments",
            sequence.len(),
            segments.len()
        );

        let mut tracking_by_path = self.load_tracking_files(&session).await?;
        let matched = match_segments(&segments, &session.video_paths)?;

        let fov_degrees = session.camera_fov.unwrap_or(self.default_fov_degrees);
        let sequence = Arc::new(sequence);

        // Validate every pair before spawning anything: a failure here must
        // leave the store untouched, not just the failing video.
        let mut pairs = Vec::with_capacity(matched.len());
        for (video_path, segment) in matched {
            let tracking = tracking_by_path
                .remove(&video_path)
                .ok_or_else(|| {
                    FusionError::processing(format!(
                        "no tracking data mapped to video {video_path}"
                    ))
                })?;

            validate_duration(&segment, &tracking.video, self.duration_tolerance_ms)?;
            pairs.push((segment, tracking));
        }

        let mut tasks = Vec::with_capacity(pairs.len());
        for (segment, tracking) in pairs {
            tasks.push(self.spawn_video_task(
                session.name.clone(),
                segment,
                tracking,
                Arc::clone(&sequence),
                fov_degrees,
            ));
        }

        let joined = futures::future::try_join_all(tasks)
            .await
            .context("video processing task panicked")?;
        let videos = joined.into_iter().collect::<anyhow::Result<Vec<_>>>()?;

        tracing::info!(
            "Flight session processing completed: {} ({} videos)",
            session.name,
            videos.len()
        );

        Ok(ProcessSummary {
            flight: session.name,
            description: session.description,
            telemetry_samples: sequence.len(),
            segments: segments.len(),
            videos,
        })
    }

    /// Scan a directory for a flight log and its video/tracking pairs, then
    /// process the discovered session.
    pub async fn process_directory(
        &self,
        name: String,
        directory: &Path,
        camera_fov: Option<f64>,
    ) -> anyhow::Result<ProcessSummary> {
        let mapping = scanner::scan_directory(directory)?;

        let session = FlightSession {
            name,
            description: None,
            log_path: mapping.flight_log.to_string_lossy().into_owned(),
            video_paths: mapping
                .videos
                .iter()
                .map(|v| v.video_file.to_string_lossy().into_owned())
                .collect(),
            tracking_paths: mapping
                .videos
                .iter()
                .map(|v| v.tracking_file.to_string_lossy().into_owned())
                .collect(),
            camera_fov,
        };

        self.process_session(session).await
    }

    pub async fn list_flights(&self) -> anyhow::Result<Vec<String>> {
        self.repository.list_flights().await
    }

    pub async fn object_trajectory(
        &self,
        flight: &str,
        video: &str,
        tracking_id: i64,
    ) -> anyhow::Result<Vec<TrajectoryPoint>> {
        self.repository
            .object_trajectory(flight, video, tracking_id)
            .await
    }

    /// Parse every tracking file up front so validation failures surface
    /// before any fusion work starts. Keyed by the video path the file
    /// belongs to (the lists are parallel).
    async fn load_tracking_files(
        &self,
        session: &FlightSession,
    ) -> anyhow::Result<HashMap<String, TrackingData>> {
        let mut tracking_by_path = HashMap::new();

        for (video_path, tracking_path) in
            session.video_paths.iter().zip(&session.tracking_paths)
        {
            let content = tokio::fs::read_to_string(tracking_path)
                .await
                .with_context(|| format!("failed to read tracking file {tracking_path}"))?;
            let tracking = tracking_file::parse_tracking_data(&content)
                .with_context(|| format!("invalid tracking file {tracking_path}"))?;

            tracking_by_path.insert(video_path.clone(), tracking);
        }

        Ok(tracking_by_path)
    }

    /// One video's fusion runs as its own task: the frame loop is CPU-bound
    /// and owns an isolated state map, so videos of the same flight only
    /// share the read-only telemetry sequence.
    fn spawn_video_task(
        &self,
        flight: String,
        segment: Segment,
        tracking: TrackingData,
        sequence: Arc<TelemetrySequence>,
        fov_degrees: f64,
    ) -> tokio::task::JoinHandle<anyhow::Result<VideoSummary>> {
        let repository = Arc::clone(&self.repository);

        tokio::spawn(async move {
            let video_name = tracking.video.name.clone();
            let model = tracking.model.clone();
            let tracker = tracking.tracker.clone();
            let segment_for_summary = segment.clone();

            let records = tokio::task::spawn_blocking(move || {
                run_fusion(
                    &tracking.video,
                    &segment,
                    &tracking.results,
                    sequence.samples(),
                    fov_degrees,
                )
            })
            .await
            .context("fusion task panicked")??;

            let objects = records.iter().map(|r| r.objects.len()).sum();

            repository
                .save_video_records(&flight, &video_name, &records)
                .await
                .with_context(|| format!("failed to persist records for {video_name}"))?;

            tracing::debug!(
                "Processed video {}: {} frames, {} object records",
                video_name,
                records.len(),
                objects
            );

            Ok(VideoSummary {
                video: video_name,
                segment: segment_for_summary,
                model,
                tracker,
                frames: records.len(),
                objects,
            })
        })
    }
}
