// Telemetry domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::FusionError;

/// One timestamped drone state reading from the flight log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySample {
    /// Milliseconds since the start of the flight log.
    pub time_from_start: i64,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above the takeoff point.
    pub altitude: f64,
    /// Compass heading in degrees, always normalized to [0, 360).
    pub heading: f64,
    pub is_recording: bool,
}

/// A validated, strictly time-ordered flight log. Construction through
/// `validate` is the admission gate for every downstream component.
#[derive(Debug, Clone)]
pub struct TelemetrySequence {
    samples: Vec<TelemetrySample>,
}

impl TelemetrySequence {
    pub fn validate(samples: Vec<TelemetrySample>) -> Result<Self, FusionError> {
        if samples.is_empty() {
            return Err(FusionError::validation("empty telemetry data"));
        }

        let mut previous_time = samples[0].time_from_start;
        for (index, sample) in samples.iter().enumerate().skip(1) {
            if sample.time_from_start <= previous_time {
                return Err(FusionError::validation(format!(
                    "invalid time sequence at index {}: {}ms is not greater than {}ms",
                    index, sample.time_from_start, previous_time
                )));
            }
            previous_time = sample.time_from_start;
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A maximal contiguous time range during which the drone was recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Milliseconds from log start.
    pub start_time: i64,
    pub end_time: i64,
    pub duration: i64,
    /// Indices into the telemetry sequence.
    pub start_index: usize,
    pub end_index: usize,
}
