pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::PredictError;
pub use http::HttpPredictionClient;
pub use traits::PredictionClient;
pub use types::{ClientConfig, HealthStatus};
