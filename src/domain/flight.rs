// Flight session and fusion output models
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::object::{ModelInfo, ObjectMetrics, TrackedObject, TrackerInfo};
use super::telemetry::Segment;

/// Input to one processing run: a flight log plus parallel lists of video
/// files and their tracking-result files.
#[derive(Debug, Clone)]
pub struct FlightSession {
    pub name: String,
    pub description: Option<String>,
    pub log_path: String,
    pub video_paths: Vec<String>,
    pub tracking_paths: Vec<String>,
    /// Horizontal camera FOV in degrees; falls back to the configured default.
    pub camera_fov: Option<f64>,
}

/// One tracked object in one frame, enriched with motion metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectRecord {
    pub object: TrackedObject,
    pub metrics: ObjectMetrics,
}

/// Fusion output for one video frame: the drone's interpolated telemetry at
/// the frame's capture time plus every enriched object observed in it.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub frame_index: u32,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub heading: f64,
    pub objects: Vec<ObjectRecord>,
}

/// One stored point of a tracked object's path, as read back from the store.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryPoint {
    pub time_ms: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub ground_speed: f64,
}

/// Per-video outcome reported by the processing endpoint, including the
/// detector/tracker provenance carried by the video's tracking file.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub video: String,
    pub segment: Segment,
    pub model: ModelInfo,
    pub tracker: TrackerInfo,
    pub frames: usize,
    pub objects: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessSummary {
    pub flight: String,
    pub description: Option<String>,
    pub telemetry_samples: usize,
    pub segments: usize,
    pub videos: Vec<VideoSummary>,
}
