// Per-video fusion driver
use std::collections::HashMap;

use crate::application::{interpolator, metrics};
use crate::domain::error::FusionError;
use crate::domain::flight::{FrameRecord, ObjectRecord};
use crate::domain::object::{ObjectWithMetrics, TrackedObject, TrackingResult};
use crate::domain::telemetry::{Segment, TelemetrySample};
use crate::domain::video::VideoMetadata;

/// The last observation per tracking id, scoped to one video. Updates in
/// frame N become the `previous` inputs of frame N+1; nothing is shared
/// across videos.
#[derive(Debug, Default)]
struct FusionState {
    by_tracking_id: HashMap<i64, ObjectWithMetrics>,
}

/// Walk every frame of one matched (video, segment) pair: interpolate the
/// drone's telemetry at the frame's capture time, then compute metrics for
/// every tracked object in that frame, threading the per-tracking-id state
/// forward. Any interpolation or metrics failure aborts the whole video.
pub fn run_fusion(
    video: &VideoMetadata,
    segment: &Segment,
    tracking: &[TrackingResult],
    samples: &[TelemetrySample],
    fov_degrees: f64,
) -> Result<Vec<FrameRecord>, FusionError> {
    let objects_by_frame: HashMap<u32, &[TrackedObject]> = tracking
        .iter()
        .map(|result| (result.frame_index, result.objects.as_slice()))
        .collect();

    let time_delta_seconds = 1.0 / video.fps;
    let mut state = FusionState::default();
    let mut records = Vec::with_capacity(video.total_frames as usize);

    for frame_index in 0..video.total_frames {
        let frame_time_ms =
            segment.start_time as f64 + frame_index as f64 / video.fps * 1000.0;

        let drone = interpolator::interpolate(samples, frame_time_ms).map_err(|err| {
            FusionError::processing(format!(
                "frame interpolation failed at frame {frame_index}: {err}"
            ))
        })?;

        let mut objects = Vec::new();
        for object in objects_by_frame.get(&frame_index).copied().unwrap_or(&[]) {
            let previous = state.by_tracking_id.get(&object.tracking_id);
            let object_metrics = metrics::compute_metrics(
                previous,
                object,
                time_delta_seconds,
                &drone,
                video,
                fov_degrees,
            );

            state.by_tracking_id.insert(
                object.tracking_id,
                ObjectWithMetrics {
                    object: object.clone(),
                    metrics: object_metrics.clone(),
                },
            );

            objects.push(ObjectRecord {
                object: object.clone(),
                metrics: object_metrics,
            });
        }

        records.push(FrameRecord {
            frame_index,
            timestamp: drone.timestamp,
            latitude: drone.latitude,
            longitude: drone.longitude,
            altitude: drone.altitude,
            heading: drone.heading,
            objects,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::object::BoundingBox;
    use chrono::{Duration, TimeZone, Utc};

    fn sample(time: i64) -> TelemetrySample {
        TelemetrySample {
            time_from_start: time,
            timestamp: Utc.with_ymd_and_hms(2024, 11, 19, 14, 27, 0).unwrap()
                + Duration::milliseconds(time),
            latitude: 35.123 + time as f64 * 1e-7,
            longitude: 139.456,
            altitude: 100.0,
            heading: 90.0,
            is_recording: true,
        }
    }

    fn video(total_frames: u32) -> VideoMetadata {
        VideoMetadata {
            name: "DJI_0268.MP4".to_string(),
            width: 1920,
            height: 1080,
            fps: 10.0,
            total_frames,
        }
    }

    fn segment() -> Segment {
        Segment {
            start_time: 1000,
            end_time: 1500,
            duration: 500,
            start_index: 1,
            end_index: 3,
        }
    }

    fn tracked(tracking_id: i64, x: f64) -> TrackedObject {
        TrackedObject {
            tracking_id,
            bounding_box: BoundingBox {
                x1: x,
                y1: 100.0,
                x2: x + 100.0,
                y2: 200.0,
            },
            confidence: 0.9,
            class_id: 1,
        }
    }

    fn telemetry() -> Vec<TelemetrySample> {
        (0..10).map(|i| sample(i * 500)).collect()
    }

    #[test]
    fn test_emits_one_record_per_frame() {
        let records = run_fusion(&video(5), &segment(), &[], &telemetry(), 84.0).unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].frame_index, 0);
        assert_eq!(records[4].frame_index, 4);
        assert!(records.iter().all(|r| r.objects.is_empty()));
    }

    #[test]
    fn test_frame_times_offset_by_segment_start() {
        // frame 0 maps to the segment start, frame 2 to 200ms later
        let records = run_fusion(&video(3), &segment(), &[], &telemetry(), 84.0).unwrap();

        let base = Utc.with_ymd_and_hms(2024, 11, 19, 14, 27, 0).unwrap();
        assert_eq!(records[0].timestamp, base + Duration::milliseconds(1000));
        assert_eq!(records[2].timestamp, base + Duration::milliseconds(1200));
    }

    #[test]
    fn test_previous_state_carries_across_frames() {
        let tracking = vec![
            TrackingResult {
                frame_index: 0,
                objects: vec![tracked(7, 100.0)],
            },
            TrackingResult {
                frame_index: 1,
                objects: vec![tracked(7, 150.0)],
            },
        ];

        let records = run_fusion(&video(2), &segment(), &tracking, &telemetry(), 84.0).unwrap();

        // first sighting: no previous, speeds are zero
        assert_eq!(records[0].objects[0].metrics.pixel_speed, 0.0);
        // second sighting: moved 50px in 0.1s
        let speed = records[1].objects[0].metrics.pixel_speed;
        assert!((speed - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_state_survives_frames_without_the_object() {
        let tracking = vec![
            TrackingResult {
                frame_index: 0,
                objects: vec![tracked(7, 100.0)],
            },
            TrackingResult {
                frame_index: 2,
                objects: vec![tracked(7, 150.0)],
            },
        ];

        let records = run_fusion(&video(3), &segment(), &tracking, &telemetry(), 84.0).unwrap();

        assert!(records[1].objects.is_empty());
        // the frame-0 observation is still the previous one at frame 2,
        // but the time delta stays 1/fps
        assert!(records[2].objects[0].metrics.pixel_speed > 0.0);
    }

    #[test]
    fn test_objects_do_not_observe_same_frame_updates() {
        let tracking = vec![TrackingResult {
            frame_index: 0,
            objects: vec![tracked(1, 100.0), tracked(2, 600.0)],
        }];

        let records = run_fusion(&video(1), &segment(), &tracking, &telemetry(), 84.0).unwrap();

        // both ids are first sightings regardless of in-frame order
        assert_eq!(records[0].objects[0].metrics.pixel_speed, 0.0);
        assert_eq!(records[0].objects[1].metrics.pixel_speed, 0.0);
    }

    #[test]
    fn test_empty_telemetry_aborts_the_video() {
        let err = run_fusion(&video(1), &segment(), &[], &[], 84.0).unwrap_err();
        match err {
            FusionError::Processing(message) => assert!(message.contains("frame 0")),
            other => panic!("expected processing error, got {other:?}"),
        }
    }
}
