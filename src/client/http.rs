use crate::client::error::PredictError;
use crate::client::traits::PredictionClient;
use crate::client::types::{ClientConfig, ErrorBody, HealthStatus, PredictionResponse};
use crate::models::{PredictionResult, PropertyAttributes};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// HTTP client for the price-prediction service
pub struct HttpPredictionClient {
    client: Client,
    config: ClientConfig,
}

impl HttpPredictionClient {
    /// Create a client with custom connection settings
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Turn a non-success status into an error, keeping the service's detail if any
    async fn check_status(response: Response) -> Result<Response, PredictError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        warn!("Prediction service returned status: {}", status);
        // The error body is opaque; a readable detail is a bonus, not required
        let detail = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message());

        Err(PredictError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PredictError> {
        let body = response.text().await.map_err(PredictError::Network)?;
        debug!("Received {} bytes from prediction service", body.len());
        serde_json::from_str(&body).map_err(|e| PredictError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, attributes: &PropertyAttributes) -> Result<PredictionResult, PredictError> {
        let url = self.url("/predict");
        info!("Requesting price estimate from {}", url);
        debug!("Payload: {:?}", attributes);

        let response = self
            .client
            .post(&url)
            .json(attributes)
            .send()
            .await
            .map_err(PredictError::Network)?;

        let response = Self::check_status(response).await?;
        let decoded: PredictionResponse = Self::decode(response).await?;
        let result = decoded.into_result().map_err(PredictError::Malformed)?;

        info!(
            "Estimate received: {} (confidence: {})",
            result.formatted_price, result.confidence
        );
        Ok(result)
    }

    async fn health(&self) -> Result<HealthStatus, PredictError> {
        let url = self.url("/health");
        debug!("Checking service health at {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(PredictError::Network)?;

        let response = Self::check_status(response).await?;
        Self::decode(response).await
    }

    fn endpoint(&self) -> &str {
        &self.config.base_url
    }
}
