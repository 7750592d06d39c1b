// Tracking-result JSON parser
use serde::Deserialize;

use crate::domain::error::FusionError;
use crate::domain::object::{
    BoundingBox, ModelInfo, TrackedObject, TrackerInfo, TrackingData, TrackingResult,
};
use crate::domain::video::VideoMetadata;

#[derive(Debug, Deserialize)]
struct RawTrackingFile {
    model: RawModel,
    tracker: RawTracker,
    video: RawVideo,
    tracking_results: Vec<RawFrame>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    name: String,
    confidence_threshold: f64,
    nms: bool,
}

#[derive(Debug, Deserialize)]
struct RawTracker {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    name: String,
    width: u32,
    height: u32,
    fps: f64,
    total_frames: u32,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    i: u32,
    res: Vec<RawObject>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    tid: i64,
    bbox: [f64; 4],
    conf: f64,
    cid: i64,
}

/// Parse one tracking file (detector/tracker provenance, video metadata,
/// per-frame results). Video metadata is validated here so projection never
/// sees zero dimensions or a non-positive frame rate.
pub fn parse_tracking_data(content: &str) -> Result<TrackingData, FusionError> {
    tracing::debug!("Parsing tracking file");

    let raw: RawTrackingFile = serde_json::from_str(content)
        .map_err(|err| FusionError::validation(format!("invalid tracking data format: {err}")))?;

    let video = VideoMetadata {
        name: raw.video.name,
        width: raw.video.width,
        height: raw.video.height,
        fps: raw.video.fps,
        total_frames: raw.video.total_frames,
    };
    video.validate()?;

    let results = raw
        .tracking_results
        .into_iter()
        .map(|frame| TrackingResult {
            frame_index: frame.i,
            objects: frame.res.into_iter().map(to_tracked_object).collect(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Tracking file parsed successfully: {} ({} frames with results)",
        video.name,
        results.len()
    );

    Ok(TrackingData {
        model: ModelInfo {
            name: raw.model.name,
            confidence_threshold: raw.model.confidence_threshold,
            nms: raw.model.nms,
        },
        tracker: TrackerInfo {
            name: raw.tracker.name,
        },
        video,
        results,
    })
}

fn to_tracked_object(raw: RawObject) -> TrackedObject {
    TrackedObject {
        tracking_id: raw.tid,
        bounding_box: BoundingBox {
            x1: raw.bbox[0],
            y1: raw.bbox[1],
            x2: raw.bbox[2],
            y2: raw.bbox[3],
        },
        confidence: raw.conf,
        class_id: raw.cid,
    }
}
