// Video domain models
use serde::Serialize;

use super::error::FusionError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: u32,
}

impl VideoMetadata {
    /// All numeric fields must be strictly positive before the metadata is
    /// usable for projection or duration checks.
    pub fn validate(&self) -> Result<(), FusionError> {
        if self.width == 0 || self.height == 0 {
            return Err(FusionError::validation(format!(
                "invalid video dimensions for {}: {}x{}",
                self.name, self.width, self.height
            )));
        }
        if self.fps <= 0.0 || self.total_frames == 0 {
            return Err(FusionError::validation(format!(
                "invalid video parameters for {}: fps={}, total_frames={}",
                self.name, self.fps, self.total_frames
            )));
        }
        Ok(())
    }

    /// Expected playback duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.total_frames as f64 / self.fps * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            name: "DJI_0268.MP4".to_string(),
            width: 1920,
            height: 1080,
            fps: 30.0,
            total_frames: 900,
        }
    }

    #[test]
    fn test_valid_metadata_passes() {
        assert!(metadata().validate().is_ok());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut m = metadata();
        m.width = 0;
        assert!(matches!(
            m.validate().unwrap_err(),
            FusionError::Validation(_)
        ));
    }

    #[test]
    fn test_non_positive_fps_rejected() {
        let mut m = metadata();
        m.fps = 0.0;
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_duration_ms() {
        assert_eq!(metadata().duration_ms(), 30_000.0);
    }
}
