//! Shared fixtures for unit tests.

use crate::client::{HealthStatus, PredictError, PredictionClient};
use crate::models::{Flag, Furnishing, PredictionResult, PropertyAttributes};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

pub fn attributes(bedrooms: u8) -> PropertyAttributes {
    PropertyAttributes {
        area: 3000.0,
        bedrooms,
        bathrooms: 2,
        stories: 2,
        mainroad: Flag::Yes,
        guestroom: Flag::No,
        basement: Flag::No,
        hotwaterheating: Flag::No,
        airconditioning: Flag::Yes,
        parking: 1,
        prefarea: Flag::No,
        furnishingstatus: Furnishing::SemiFurnished,
    }
}

pub fn prediction(confidence: &str) -> PredictionResult {
    PredictionResult {
        formatted_price: "R$ 450.000,00".into(),
        confidence: confidence.into(),
        price: None,
        features: None,
        received_at: Utc::now(),
    }
}

/// Replays scripted answers in order and records every payload it was sent
pub struct ScriptedClient {
    answers: Mutex<Vec<Result<PredictionResult, PredictError>>>,
    sent: Mutex<Vec<PropertyAttributes>>,
}

impl ScriptedClient {
    pub fn new(mut answers: Vec<Result<PredictionResult, PredictError>>) -> Self {
        answers.reverse();
        Self {
            answers: Mutex::new(answers),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<PropertyAttributes> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionClient for ScriptedClient {
    async fn predict(&self, attributes: &PropertyAttributes) -> Result<PredictionResult, PredictError> {
        self.sent.lock().unwrap().push(attributes.clone());
        self.answers
            .lock()
            .unwrap()
            .pop()
            .expect("no scripted answer left")
    }

    async fn health(&self) -> Result<HealthStatus, PredictError> {
        Ok(HealthStatus {
            status: "healthy".into(),
            model: Some("carregado".into()),
            version: Some("1.0.0".into()),
        })
    }

    fn endpoint(&self) -> &str {
        "scripted"
    }
}
