// InfluxDB repository implementation
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::application::fusion_repository::FusionRepository;
use crate::domain::flight::{FrameRecord, TrajectoryPoint};
use crate::infrastructure::config::InfluxSettings;

/// Persists fusion output as two measurements over the InfluxDB 1.x-compat
/// HTTP API: `frame_telemetry` (the drone's interpolated state per frame)
/// and `object_track` (one point per tracked object per frame, tagged by
/// flight, video and tracking id).
#[derive(Debug, Clone)]
pub struct InfluxRepository {
    host: String,
    token: String,
    database: String,
    retention_policy: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    #[allow(dead_code)]
    name: String,
    columns: Vec<String>,
    values: Vec<Vec<serde_json::Value>>,
}

impl InfluxRepository {
    pub fn new(settings: InfluxSettings) -> Self {
        Self {
            host: settings.host.trim_end_matches('/').to_string(),
            token: settings.token,
            database: settings.database,
            retention_policy: settings.retention_policy,
            client: reqwest::Client::new(),
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&rp={}&q={}",
            self.host, self.database, self.retention_policy, encoded_query
        )
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("failed to send query to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("failed to parse InfluxDB response")?;

        if let Some(result) = data.results.first() {
            if let Some(error) = &result.error {
                anyhow::bail!("InfluxDB query error: {}", error);
            }
        }

        Ok(data)
    }

    async fn write_lines(&self, lines: String) -> Result<()> {
        let url = format!(
            "{}/write?db={}&rp={}&precision=ms",
            self.host, self.database, self.retention_policy
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.token))
            .body(lines)
            .send()
            .await
            .context("failed to send write to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB write failed with status {}: {}", status, body);
        }

        Ok(())
    }
}

/// Escape a tag value per line protocol (spaces, commas and equals signs).
fn escape_tag(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(' ', "\\ ")
        .replace(',', "\\,")
        .replace('=', "\\=")
}

fn record_lines(flight: &str, video: &str, records: &[FrameRecord]) -> String {
    let flight_tag = escape_tag(flight);
    let video_tag = escape_tag(video);
    let mut lines = String::new();

    for record in records {
        let ts_ms = record.timestamp.timestamp_millis();

        lines.push_str(&format!(
            "frame_telemetry,flight={},video={} frame_index={}i,latitude={},longitude={},altitude={},heading={} {}\n",
            flight_tag,
            video_tag,
            record.frame_index,
            record.latitude,
            record.longitude,
            record.altitude,
            record.heading,
            ts_ms
        ));

        for object in &record.objects {
            lines.push_str(&format!(
                "object_track,flight={},video={},tid={} frame_index={}i,latitude={},longitude={},pixel_speed={},ground_speed={},course_heading={},confidence={},class_id={}i {}\n",
                flight_tag,
                video_tag,
                object.object.tracking_id,
                record.frame_index,
                object.metrics.location.latitude,
                object.metrics.location.longitude,
                object.metrics.pixel_speed,
                object.metrics.ground_speed,
                object.metrics.course_heading,
                object.object.confidence,
                object.object.class_id,
                ts_ms
            ));
        }
    }

    lines
}

#[async_trait]
impl FusionRepository for InfluxRepository {
    async fn list_flights(&self) -> Result<Vec<String>> {
        let query = "SHOW TAG VALUES FROM object_track WITH KEY = flight";
        let response = self.execute_query(query).await?;

        let mut flights = Vec::new();
        if let Some(result) = response.results.first() {
            if let Some(series) = &result.series {
                for s in series {
                    for value_row in &s.values {
                        if value_row.len() >= 2 {
                            if let Some(flight) = value_row[1].as_str() {
                                flights.push(flight.to_string());
                            }
                        }
                    }
                }
            }
        }

        Ok(flights)
    }

    async fn save_video_records(
        &self,
        flight: &str,
        video: &str,
        records: &[FrameRecord],
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let lines = record_lines(flight, video, records);
        tracing::debug!(
            "Writing {} frame records for {}/{} to InfluxDB",
            records.len(),
            flight,
            video
        );

        self.write_lines(lines).await
    }

    async fn object_trajectory(
        &self,
        flight: &str,
        video: &str,
        tracking_id: i64,
    ) -> Result<Vec<TrajectoryPoint>> {
        let query = format!(
            "SELECT latitude, longitude, ground_speed FROM object_track \
             WHERE flight = '{}' AND video = '{}' AND tid = '{}' ORDER BY time",
            flight.replace('\'', "\\'"),
            video.replace('\'', "\\'"),
            tracking_id
        );

        let response = self.execute_query(&query).await?;

        let mut points = Vec::new();
        if let Some(result) = response.results.first() {
            if let Some(series) = &result.series {
                for s in series {
                    let time_idx = s.columns.iter().position(|c| c == "time").unwrap_or(0);
                    let lat_idx = s.columns.iter().position(|c| c == "latitude").unwrap_or(1);
                    let lon_idx = s.columns.iter().position(|c| c == "longitude").unwrap_or(2);
                    let speed_idx = s
                        .columns
                        .iter()
                        .position(|c| c == "ground_speed")
                        .unwrap_or(3);

                    for value_row in &s.values {
                        let time_ms = match value_row.get(time_idx) {
                            Some(serde_json::Value::String(raw)) => {
                                match chrono::DateTime::parse_from_rfc3339(raw) {
                                    Ok(time) => time.timestamp_millis(),
                                    Err(_) => continue,
                                }
                            }
                            Some(value) => match value.as_i64() {
                                Some(ms) => ms,
                                None => continue,
                            },
                            None => continue,
                        };

                        let (Some(latitude), Some(longitude), Some(ground_speed)) = (
                            value_row.get(lat_idx).and_then(|v| v.as_f64()),
                            value_row.get(lon_idx).and_then(|v| v.as_f64()),
                            value_row.get(speed_idx).and_then(|v| v.as_f64()),
                        ) else {
                            continue;
                        };

                        points.push(TrajectoryPoint {
                            time_ms,
                            latitude,
                            longitude,
                            ground_speed,
                        });
                    }
                }
            }
        }

        Ok(points)
    }
}
