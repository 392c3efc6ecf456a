use crate::client::error::PredictError;
use crate::client::types::HealthStatus;
use crate::models::{PredictionResult, PropertyAttributes};
use async_trait::async_trait;

/// A price-prediction backend.
///
/// Each call performs exactly one exchange: no retries, no caching, no
/// deduplication. Calling twice with the same attributes sends twice.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Send the attributes and decode the estimate
    async fn predict(&self, attributes: &PropertyAttributes) -> Result<PredictionResult, PredictError>;

    /// Ask the service whether its model is loaded and ready
    async fn health(&self) -> Result<HealthStatus, PredictError>;

    /// Address the client talks to, for display and logs
    fn endpoint(&self) -> &str;
}
