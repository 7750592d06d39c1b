// Recording-segment detection and video matching
use crate::domain::error::FusionError;
use crate::domain::telemetry::{Segment, TelemetrySample};
use crate::domain::video::VideoMetadata;

/// Extract the maximal contiguous sub-ranges of the log flagged as
/// recording. A segment ends on the last recording sample, not on the
/// sample that reports recording stopped; a segment still open at the end
/// of the log closes on the final sample. No recording samples means no
/// segments.
pub fn detect_segments(samples: &[TelemetrySample]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut open: Option<usize> = None;

    for (index, sample) in samples.iter().enumerate() {
        match (sample.is_recording, open) {
            (true, None) => open = Some(index),
            (false, Some(start_index)) => {
                segments.push(close_segment(samples, start_index, index - 1));
                open = None;
            }
            _ => {}
        }
    }

    if let Some(start_index) = open {
        segments.push(close_segment(samples, start_index, samples.len() - 1));
    }

    segments
}

fn close_segment(samples: &[TelemetrySample], start_index: usize, end_index: usize) -> Segment {
    let start_time = samples[start_index].time_from_start;
    let end_time = samples[end_index].time_from_start;
    Segment {
        start_time,
        end_time,
        duration: end_time - start_time,
        start_index,
        end_index,
    }
}

/// Pair video files with segments positionally: paths sorted
/// lexicographically against segments in time order. This inherits the
/// source convention that filename order equals chronological recording
/// order; a count mismatch is the only detectable inconsistency.
pub fn match_segments(
    segments: &[Segment],
    video_paths: &[String],
) -> Result<Vec<(String, Segment)>, FusionError> {
    if segments.len() != video_paths.len() {
        return Err(FusionError::processing(format!(
            "number of video segments ({}) does not match number of video files ({})",
            segments.len(),
            video_paths.len()
        )));
    }

    let mut sorted_paths = video_paths.to_vec();
    sorted_paths.sort();

    Ok(sorted_paths
        .into_iter()
        .zip(segments.iter().cloned())
        .collect())
}

/// Check that a segment's duration agrees with the video's frame count and
/// frame rate within `tolerance_ms`.
pub fn validate_duration(
    segment: &Segment,
    metadata: &VideoMetadata,
    tolerance_ms: i64,
) -> Result<(), FusionError> {
    let expected = metadata.duration_ms();
    let diff = (segment.duration as f64 - expected).abs();

    if diff > tolerance_ms as f64 {
        return Err(FusionError::processing(format!(
            "segment duration ({}ms) significantly differs from video duration ({}ms) for {}",
            segment.duration, expected, metadata.name
        )));
    }

    Ok(())
}
