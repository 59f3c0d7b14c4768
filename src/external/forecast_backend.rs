use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PredictionRequest, PredictionResponse, SuggestionItem};

pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch prediction. Please try again.";
pub const GENERIC_SHAPE_FAILURE: &str = "Prediction failed: Invalid response format from server.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl ApiError {
    /// Text shown next to the retry button.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => GENERIC_FETCH_FAILURE.to_string(),
            ApiError::Server { detail, .. } => detail.clone(),
            ApiError::Parse(_) | ApiError::Shape(_) => GENERIC_SHAPE_FAILURE.to_string(),
        }
    }
}

/// The remote symbol-search and forecasting service.
#[async_trait]
pub trait ForecastBackend: Send + Sync {
    async fn search_symbols(&self, query: &str) -> Result<Vec<SuggestionItem>, ApiError>;

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, ApiError>;
}
