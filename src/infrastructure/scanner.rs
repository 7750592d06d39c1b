// Flight-data directory scanner
use std::path::{Path, PathBuf};

use crate::domain::error::FusionError;

/// Files discovered for one flight: the log plus video/tracking pairs,
/// videos sorted by filename so lexicographic order matches the segment
/// matcher's convention.
#[derive(Debug, Clone)]
pub struct FlightDataMapping {
    pub flight_log: PathBuf,
    pub videos: Vec<VideoFiles>,
}

#[derive(Debug, Clone)]
pub struct VideoFiles {
    pub video_file: PathBuf,
    pub tracking_file: PathBuf,
}

/// Scan a directory laid out the way the capture workflow leaves it:
/// one flight-log `.csv`, `DJI_<n>.MP4` videos, and per-video
/// `bytetrack_*DJI_<n>*.json` tracking files.
pub fn scan_directory(directory: &Path) -> Result<FlightDataMapping, FusionError> {
    let entries = std::fs::read_dir(directory).map_err(|err| {
        FusionError::validation(format!("directory not found: {}: {err}", directory.display()))
    })?;

    let mut file_names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    file_names.sort();

    let logs: Vec<&String> = file_names
        .iter()
        .filter(|name| name.ends_with(".csv"))
        .collect();
    let flight_log = match logs.as_slice() {
        [] => {
            return Err(FusionError::validation(format!(
                "no flight log found in {}",
                directory.display()
            )));
        }
        [single] => directory.join(single),
        _ => {
            return Err(FusionError::validation(format!(
                "multiple flight logs found in {}, expected exactly one",
                directory.display()
            )));
        }
    };

    let mut videos = Vec::new();
    for name in &file_names {
        let Some(video_number) = extract_video_number(name) else {
            continue;
        };

        let marker = format!("DJI_{video_number}");
        let tracking = file_names.iter().find(|candidate| {
            candidate.starts_with("bytetrack_")
                && candidate.contains(&marker)
                && candidate.ends_with(".json")
        });

        let Some(tracking) = tracking else {
            return Err(FusionError::validation(format!(
                "missing tracking file for video {name} (expected bytetrack_*{marker}*.json)"
            )));
        };

        videos.push(VideoFiles {
            video_file: directory.join(name),
            tracking_file: directory.join(tracking),
        });
    }

    if videos.is_empty() {
        return Err(FusionError::validation(format!(
            "no DJI_*.MP4 videos found in {}",
            directory.display()
        )));
    }

    Ok(FlightDataMapping { flight_log, videos })
}

/// Pull the number out of a `DJI_0268.MP4` style filename.
fn extract_video_number(file_name: &str) -> Option<&str> {
    let number = file_name.strip_prefix("DJI_")?.strip_suffix(".MP4")?;
    if !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) {
        Some(number)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(name: &str, files: &[&str]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("drone_fusion_scanner_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for file in files {
            std::fs::write(dir.join(file), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_extract_video_number() {
        assert_eq!(extract_video_number("DJI_0268.MP4"), Some("0268"));
        assert_eq!(extract_video_number("DJI_.MP4"), None);
        assert_eq!(extract_video_number("DJI_0268.mov"), None);
        assert_eq!(extract_video_number("IMG_0268.MP4"), None);
    }

    #[test]
    fn test_scans_full_layout() {
        let dir = setup(
            "full",
            &[
                "Nov-19th-2024-Flight-Airdata.csv",
                "DJI_0268.MP4",
                "bytetrack_yolov11s_v4_DJI_0268.json",
                "DJI_0269.MP4",
                "bytetrack_yolov11s_v4_DJI_0269.json",
            ],
        );

        let mapping = scan_directory(&dir).unwrap();

        assert!(mapping.flight_log.ends_with("Nov-19th-2024-Flight-Airdata.csv"));
        assert_eq!(mapping.videos.len(), 2);
        assert!(mapping.videos[0].video_file.ends_with("DJI_0268.MP4"));
        assert!(
            mapping.videos[0]
                .tracking_file
                .ends_with("bytetrack_yolov11s_v4_DJI_0268.json")
        );
        assert!(mapping.videos[1].video_file.ends_with("DJI_0269.MP4"));
    }

    #[test]
    fn test_missing_tracking_file_is_an_error() {
        let dir = setup("missing_tracking", &["log.csv", "DJI_0268.MP4"]);

        match scan_directory(&dir).unwrap_err() {
            FusionError::Validation(message) => assert!(message.contains("DJI_0268.MP4")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_no_flight_log_is_an_error() {
        let dir = setup(
            "no_log",
            &["DJI_0268.MP4", "bytetrack_yolov11s_DJI_0268.json"],
        );
        assert!(scan_directory(&dir).is_err());
    }

    #[test]
    fn test_multiple_flight_logs_rejected() {
        let dir = setup(
            "two_logs",
            &[
                "a.csv",
                "b.csv",
                "DJI_0268.MP4",
                "bytetrack_yolov11s_DJI_0268.json",
            ],
        );
        assert!(scan_directory(&dir).is_err());
    }
}
