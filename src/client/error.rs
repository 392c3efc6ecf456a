use thiserror::Error;

/// Why a prediction exchange did not produce a usable result
#[derive(Debug, Error)]
pub enum PredictError {
    /// The request never completed (connection refused, DNS, transport timeout...)
    #[error("Could not reach the prediction service: {0}")]
    Network(#[source] reqwest::Error),

    /// The service answered with a non-success status
    #[error("The prediction service responded with status {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    /// A success status with a body that is not a usable prediction
    #[error("The prediction service returned an unexpected response: {0}")]
    Malformed(String),
}

impl PredictError {
    /// Short category name for logs
    pub fn category(&self) -> &'static str {
        match self {
            PredictError::Network(_) => "network",
            PredictError::Status { .. } => "status",
            PredictError::Malformed(_) => "malformed",
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {}", detail),
        None => String::new(),
    }
}
