// Source trait for the two telemetry resources the view polls
use crate::domain::reading::{Prediction, Reading};
use crate::infrastructure::error::FetchError;
use async_trait::async_trait;

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Full history snapshot, in the order the server returns it
    async fn fetch_history(&self) -> Result<Vec<Reading>, FetchError>;

    /// Latest batch of predictions
    async fn fetch_predictions(&self) -> Result<Vec<Prediction>, FetchError>;
}
