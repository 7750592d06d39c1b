// Temporal interpolation of telemetry to arbitrary timestamps
use chrono::Duration;

use crate::domain::error::FusionError;
use crate::domain::geo::normalize_heading;
use crate::domain::telemetry::TelemetrySample;

/// Synthesize a telemetry sample at `target_time` (milliseconds from log
/// start). Times at or outside the log range clamp to the boundary sample;
/// anything in between is a linear blend of the bracketing pair, with the
/// heading taken along the shorter angular path.
pub fn interpolate(
    samples: &[TelemetrySample],
    target_time: f64,
) -> Result<TelemetrySample, FusionError> {
    let first = samples.first().ok_or_else(|| {
        FusionError::processing("no telemetry data available for interpolation")
    })?;
    let last = &samples[samples.len() - 1];

    if target_time <= first.time_from_start as f64 {
        return Ok(first.clone());
    }
    if target_time >= last.time_from_start as f64 {
        return Ok(last.clone());
    }

    let index = find_interpolation_index(samples, target_time);
    let before = &samples[index];
    let after = &samples[index + 1];

    let ratio = (target_time - before.time_from_start as f64)
        / ((after.time_from_start - before.time_from_start) as f64);

    let span_ms = (after.timestamp - before.timestamp).num_milliseconds() as f64;
    let timestamp = before.timestamp + Duration::milliseconds((span_ms * ratio).round() as i64);

    Ok(TelemetrySample {
        time_from_start: target_time.round() as i64,
        timestamp,
        latitude: lerp(before.latitude, after.latitude, ratio),
        longitude: lerp(before.longitude, after.longitude, ratio),
        altitude: lerp(before.altitude, after.altitude, ratio),
        heading: interpolate_heading(before.heading, after.heading, ratio),
        // not meaningfully interpolatable; carry the earlier state
        is_recording: before.is_recording,
    })
}

/// Invariant-narrowing binary search: `left` and `right` converge to the
/// unique adjacent pair with `samples[left].time <= target < samples[right].time`.
fn find_interpolation_index(samples: &[TelemetrySample], target_time: f64) -> usize {
    let mut left = 0;
    let mut right = samples.len() - 1;

    while left + 1 < right {
        let mid = (left + right) / 2;
        if samples[mid].time_from_start as f64 <= target_time {
            left = mid;
        } else {
            right = mid;
        }
    }

    left
}

fn lerp(start: f64, end: f64, ratio: f64) -> f64 {
    start + (end - start) * ratio
}

/// Interpolate an angle along the shorter path around the circle, e.g.
/// 350° to 10° passes through 0°, not 180°.
fn interpolate_heading(start: f64, end: f64, ratio: f64) -> f64 {
    let mut diff = end - start;
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff < -180.0 {
        diff += 360.0;
    }
    normalize_heading(start + diff * ratio)
}
