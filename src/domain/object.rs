// Tracked-object domain models
use serde::Serialize;

use super::geo::GeoPoint;
use super::video::VideoMetadata;

/// Pixel-space bounding box, origin at the top-left of the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

/// One detection in one frame, as supplied by the external tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedObject {
    /// Stable across frames for the same physical object.
    pub tracking_id: i64,
    pub bounding_box: BoundingBox,
    pub confidence: f64,
    pub class_id: i64,
}

/// Estimated real-world motion of one tracked object at one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectMetrics {
    /// Pixels per second; zero when no prior observation exists.
    pub pixel_speed: f64,
    /// Meters per second; zero when no prior observation exists.
    pub ground_speed: f64,
    pub location: GeoPoint,
    /// Compass direction of the object's estimated motion, degrees [0, 360).
    pub course_heading: f64,
}

/// A tracked object together with its computed metrics. The fusion driver
/// keeps the last one per tracking id as the "previous" input for the next
/// frame containing that id.
#[derive(Debug, Clone)]
pub struct ObjectWithMetrics {
    pub object: TrackedObject,
    pub metrics: ObjectMetrics,
}

/// Tracker output for one frame.
#[derive(Debug, Clone)]
pub struct TrackingResult {
    pub frame_index: u32,
    pub objects: Vec<TrackedObject>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub confidence_threshold: f64,
    pub nms: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackerInfo {
    pub name: String,
}

/// Everything one tracking file carries: detector/tracker provenance, the
/// video it was produced from, and the per-frame results.
#[derive(Debug, Clone)]
pub struct TrackingData {
    pub model: ModelInfo,
    pub tracker: TrackerInfo,
    pub video: VideoMetadata,
    pub results: Vec<TrackingResult>,
}
