// Repository trait for persisting and reading back fusion results
use async_trait::async_trait;

use crate::domain::flight::{FrameRecord, TrajectoryPoint};

#[async_trait]
pub trait FusionRepository: Send + Sync {
    /// List the names of all flights known to the store.
    async fn list_flights(&self) -> anyhow::Result<Vec<String>>;

    /// Persist the fusion output for one video of one flight.
    async fn save_video_records(
        &self,
        flight: &str,
        video: &str,
        records: &[FrameRecord],
    ) -> anyhow::Result<()>;

    /// Stored path of one tracked object within one video, in time order.
    async fn object_trajectory(
        &self,
        flight: &str,
        video: &str,
        tracking_id: i64,
    ) -> anyhow::Result<Vec<TrajectoryPoint>>;
}
