use crate::models::{FeatureValue, PredictionResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Connection settings for the prediction service
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base address of the service, without trailing slash
    pub base_url: String,
    /// Transport-level timeout; the client adds no timeout policy of its own
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Success body of `POST /predict`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PredictionResponse {
    pub preco_formatado: String,
    pub confianca: String,
    #[serde(default)]
    pub preco_predito: Option<f64>,
    #[serde(default)]
    pub features: Option<BTreeMap<String, FeatureValue>>,
    #[serde(default)]
    pub features_utilizadas: Option<BTreeMap<String, FeatureValue>>,
}

impl PredictionResponse {
    /// Reject bodies that decoded but cannot be shown as a complete result
    pub fn into_result(self) -> Result<PredictionResult, String> {
        if self.preco_formatado.trim().is_empty() {
            return Err("formatted price is empty".to_string());
        }
        if self.confianca.trim().is_empty() {
            return Err("confidence label is empty".to_string());
        }
        Ok(PredictionResult {
            formatted_price: self.preco_formatado,
            confidence: self.confianca,
            price: self.preco_predito,
            features: self.features.or(self.features_utilizadas),
            received_at: Utc::now(),
        })
    }
}

/// Error body the service uses for non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Extract a readable detail; validation errors come back as a list
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, rename = "modelo")]
    pub model: Option<String>,
    #[serde(default, rename = "versao")]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
