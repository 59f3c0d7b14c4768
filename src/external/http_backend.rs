use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::external::forecast_backend::{ApiError, ForecastBackend};
use crate::models::{PredictionRequest, PredictionResponse, SuggestionItem};

const SEARCH_PATH: &str = "api/stocks/search";
const PREDICT_PATH: &str = "api/predict";

pub struct HttpForecastBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpForecastBackend {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_base_url.clone(), config.request_timeout)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("invalid endpoint {}: {}", path, e)))
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    results: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PredictEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    results: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// FastAPI sends `detail` as a string for raised errors and as a list of
/// objects for request validation failures.
fn detail_message(detail: Option<serde_json::Value>) -> Option<String> {
    match detail? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Turns a non-2xx response into `ApiError::Server`, deriving the message
/// from the `{ detail }` body when there is one.
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let detail = match resp.json::<ErrorBody>().await {
        Ok(body) => detail_message(body.detail)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
        Err(_) => "An unknown error occurred".to_string(),
    };

    Err(ApiError::Server {
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl ForecastBackend for HttpForecastBackend {
    async fn search_symbols(&self, query: &str) -> Result<Vec<SuggestionItem>, ApiError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let resp = self
            .client
            .get(self.endpoint(SEARCH_PATH)?)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body: SearchEnvelope = ensure_success(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        // A missing or malformed `results` field reads as "no matches".
        let items = match body.results {
            Some(value) => serde_json::from_value::<Vec<SuggestionItem>>(value).unwrap_or_else(|e| {
                warn!("Ignoring malformed search results for '{}': {}", query, e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        debug!("Search '{}' returned {} matches", query, items.len());
        Ok(items)
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, ApiError> {
        info!(
            "POST /api/predict - {} ({} days ahead, {} history)",
            request.symbol, request.days_ahead, request.period
        );

        let resp = self
            .client
            .post(self.endpoint(PREDICT_PATH)?)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let envelope: PredictEnvelope = ensure_success(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let results = match (envelope.success, envelope.results) {
            (Some(true), Some(results)) => results,
            (success, results) => {
                return Err(ApiError::Shape(format!(
                    "success={:?}, results present={}",
                    success,
                    results.is_some()
                )));
            }
        };

        let response: PredictionResponse =
            serde_json::from_value(results).map_err(|e| ApiError::Shape(e.to_string()))?;
        response.check_invariants().map_err(ApiError::Shape)?;

        info!(
            "✓ Prediction for {}: {} historical, {} future points",
            request.symbol,
            response.historical_dates.len(),
            response.future_dates.len()
        );
        Ok(response)
    }
}
