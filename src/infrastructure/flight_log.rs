// Flight-log CSV parser
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::error::FusionError;
use crate::domain::geo::{FEET_TO_METERS, normalize_heading};
use crate::domain::telemetry::{TelemetrySample, TelemetrySequence};

/// One raw CSV row, with the header names the source flight logs use.
#[derive(Debug, Deserialize)]
struct RawLogRow {
    #[serde(rename = "time(millisecond)")]
    time: i64,
    #[serde(rename = "datetime(utc)")]
    datetime: String,
    latitude: f64,
    longitude: f64,
    #[serde(rename = "ascent(feet)")]
    ascent_feet: f64,
    #[serde(rename = "compass_heading(degrees)")]
    compass_heading: f64,
    #[serde(rename = "isVideo")]
    is_video: String,
}

/// Parse and validate a whole flight log: unit conversion, timestamp
/// parsing and heading normalization per row, then strict time-ordering
/// across the sequence.
pub fn parse_flight_log(content: &str) -> Result<TelemetrySequence, FusionError> {
    tracing::debug!("Parsing flight log");

    if content.trim().is_empty() {
        return Err(FusionError::validation("invalid CSV format: empty content"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut samples = Vec::new();
    for (index, row) in reader.deserialize::<RawLogRow>().enumerate() {
        let row = row.map_err(|err| {
            FusionError::validation(format!("invalid CSV format at row {index}: {err}"))
        })?;
        samples.push(to_sample(row)?);
    }

    if samples.is_empty() {
        return Err(FusionError::validation(
            "invalid CSV format: no data rows found",
        ));
    }

    let sequence = TelemetrySequence::validate(samples)?;
    tracing::debug!("Flight log parsed successfully: {} samples", sequence.len());

    Ok(sequence)
}

fn to_sample(row: RawLogRow) -> Result<TelemetrySample, FusionError> {
    Ok(TelemetrySample {
        time_from_start: row.time,
        timestamp: parse_utc_datetime(&row.datetime)?,
        latitude: row.latitude,
        longitude: row.longitude,
        altitude: row.ascent_feet * FEET_TO_METERS,
        heading: normalize_heading(row.compass_heading),
        is_recording: row.is_video == "1",
    })
}

/// The logs carry timestamps either as `YYYY-MM-DD HH:MM:SS[.fff]` or as
/// ISO-8601 with a trailing `Z`; both mean UTC.
fn parse_utc_datetime(raw: &str) -> Result<DateTime<Utc>, FusionError> {
    let mut iso = raw.replacen(' ', "T", 1);
    if !iso.ends_with('Z') {
        iso.push('Z');
    }

    DateTime::parse_from_rfc3339(&iso)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| FusionError::validation(format!("invalid date format: {raw}")))
}
