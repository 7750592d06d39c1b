// Geodetic projection and per-object motion metrics
use crate::domain::geo::{self, GeoPoint};
use crate::domain::object::{ObjectMetrics, ObjectWithMetrics, TrackedObject};
use crate::domain::telemetry::TelemetrySample;
use crate::domain::video::VideoMetadata;

/// Compute one object's metrics for one frame: pixel and ground speed from
/// the previous observation of the same tracking id, estimated GPS location
/// from pinhole projection off the drone's interpolated telemetry, and the
/// object's course heading. Pure; the caller owns carrying the result
/// forward as the next frame's `previous`.
pub fn compute_metrics(
    previous: Option<&ObjectWithMetrics>,
    current: &TrackedObject,
    time_delta_seconds: f64,
    drone: &TelemetrySample,
    video: &VideoMetadata,
    fov_degrees: f64,
) -> ObjectMetrics {
    let pixel_speed = previous
        .map(|prev| pixel_distance(&prev.object, current) / time_delta_seconds)
        .unwrap_or(0.0);

    let ground_resolution = ground_resolution(drone.altitude, fov_degrees, video.width);
    let ground_speed = pixel_speed * ground_resolution;

    let location = project_to_ground(drone, &current.bounding_box.center(), video, fov_degrees);

    let course_heading = match previous {
        Some(prev) => geo::initial_bearing(prev.metrics.location, location),
        None => drone.heading,
    };

    ObjectMetrics {
        pixel_speed,
        ground_speed,
        location,
        course_heading,
    }
}

fn pixel_distance(previous: &TrackedObject, current: &TrackedObject) -> f64 {
    let (px, py) = previous.bounding_box.center();
    let (cx, cy) = current.bounding_box.center();
    ((cx - px).powi(2) + (cy - py).powi(2)).sqrt()
}

/// Real-world meters represented by one image pixel at the drone's
/// altitude: the ground footprint of the horizontal FOV divided by the
/// image width.
fn ground_resolution(altitude: f64, fov_degrees: f64, image_width: u32) -> f64 {
    let ground_width = 2.0 * altitude * (fov_degrees / 2.0).to_radians().tan();
    ground_width / image_width as f64
}

/// Project a pixel position onto the ground as a GPS coordinate, using a
/// pinhole camera pointed straight down. The vertical FOV is derived from
/// the horizontal one via the aspect ratio, and the slant distance is a
/// flat-ground approximation, exact only at nadir.
fn project_to_ground(
    drone: &TelemetrySample,
    pixel: &(f64, f64),
    video: &VideoMetadata,
    fov_degrees: f64,
) -> GeoPoint {
    let width = video.width as f64;
    let height = video.height as f64;

    // offset from the image center; image Y grows downward
    let delta_x = pixel.0 - width / 2.0;
    let delta_y = height / 2.0 - pixel.1;

    let angle_x = delta_x / width * fov_degrees;
    let angle_y = delta_y / height * (fov_degrees * (height / width));

    let distance = drone.altitude
        * (angle_x.to_radians().tan().powi(2) + angle_y.to_radians().tan().powi(2)).sqrt();

    let bearing = geo::normalize_heading(
        drone.heading + delta_x.atan2(delta_y).to_degrees() + 360.0,
    );

    geo::destination_point(
        GeoPoint::new(drone.latitude, drone.longitude),
        bearing,
        distance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::object::BoundingBox;
    use chrono::{TimeZone, Utc};

    fn drone() -> TelemetrySample {
        TelemetrySample {
            time_from_start: 0,
            timestamp: Utc.with_ymd_and_hms(2024, 11, 19, 14, 27, 0).unwrap(),
            latitude: 35.123,
            longitude: 139.456,
            altitude: 100.0,
            heading: 90.0,
            is_recording: true,
        }
    }

    fn video() -> VideoMetadata {
        VideoMetadata {
            name: "test.mp4".to_string(),
            width: 1920,
            height: 1080,
            fps: 30.0,
            total_frames: 100,
        }
    }

    fn object(x1: f64, y1: f64, x2: f64, y2: f64) -> TrackedObject {
        TrackedObject {
            tracking_id: 1,
            bounding_box: BoundingBox { x1, y1, x2, y2 },
            confidence: 0.9,
            class_id: 1,
        }
    }

    #[test]
    fn test_stationary_object_has_zero_speed() {
        let obj = object(100.0, 100.0, 200.0, 200.0);
        let previous = ObjectWithMetrics {
            object: obj.clone(),
            metrics: compute_metrics(None, &obj, 1.0 / 30.0, &drone(), &video(), 95.0),
        };

        let metrics = compute_metrics(
            Some(&previous),
            &obj,
            1.0 / 30.0,
            &drone(),
            &video(),
            95.0,
        );

        assert_eq!(metrics.pixel_speed, 0.0);
        assert_eq!(metrics.ground_speed, 0.0);
    }

    #[test]
    fn test_no_previous_observation_defaults() {
        let obj = object(100.0, 100.0, 200.0, 200.0);
        let metrics = compute_metrics(None, &obj, 1.0 / 30.0, &drone(), &video(), 95.0);

        assert_eq!(metrics.pixel_speed, 0.0);
        assert_eq!(metrics.ground_speed, 0.0);
        assert_eq!(metrics.course_heading, drone().heading);
    }

    #[test]
    fn test_moving_object_has_positive_speeds() {
        let prev_obj = object(100.0, 100.0, 200.0, 200.0);
        let previous = ObjectWithMetrics {
            object: prev_obj.clone(),
            metrics: compute_metrics(None, &prev_obj, 1.0 / 30.0, &drone(), &video(), 95.0),
        };
        let current = object(150.0, 150.0, 250.0, 250.0);

        let metrics = compute_metrics(
            Some(&previous),
            &current,
            1.0 / 30.0,
            &drone(),
            &video(),
            95.0,
        );

        // centers moved 50px in x and y: ~70.71px over 1/30s
        let expected_pixel_speed = (50.0f64.powi(2) * 2.0).sqrt() * 30.0;
        assert!((metrics.pixel_speed - expected_pixel_speed).abs() < 1e-9);
        assert!(metrics.ground_speed > 0.0);
        assert!(metrics.course_heading >= 0.0 && metrics.course_heading < 360.0);
    }

    #[test]
    fn test_centered_object_projects_to_drone_position() {
        let v = video();
        let half_w = v.width as f64 / 2.0;
        let half_h = v.height as f64 / 2.0;
        let obj = object(half_w - 50.0, half_h - 50.0, half_w + 50.0, half_h + 50.0);

        let metrics = compute_metrics(None, &obj, 1.0 / 30.0, &drone(), &v, 95.0);

        assert!((metrics.location.latitude - drone().latitude).abs() < 0.001);
        assert!((metrics.location.longitude - drone().longitude).abs() < 0.001);
    }

    #[test]
    fn test_offset_object_lands_on_the_bearing_side() {
        // object in the upper half of the image is ahead of the drone;
        // with heading 0 that means north of it
        let mut d = drone();
        d.heading = 0.0;
        let v = video();
        let obj = object(
            v.width as f64 / 2.0 - 50.0,
            100.0,
            v.width as f64 / 2.0 + 50.0,
            200.0,
        );

        let metrics = compute_metrics(None, &obj, 1.0 / 30.0, &d, &v, 84.0);
        assert!(metrics.location.latitude > d.latitude);
    }

    #[test]
    fn test_ground_resolution_scales_with_altitude() {
        let low = ground_resolution(50.0, 84.0, 1920);
        let high = ground_resolution(100.0, 84.0, 1920);
        assert!((high / low - 2.0).abs() < 1e-12);
    }
}
