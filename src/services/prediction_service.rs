use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::ForecastBackend;
use crate::models::{
    Forecast, Period, PredictionRequest, SuggestionItem, DAYS_AHEAD_MAX, DAYS_AHEAD_MIN,
};
use crate::services::series_service;

pub const DEFAULT_DAYS_AHEAD: i64 = 7;

/// The "Train & Forecast" form: chosen symbol, horizon, history period, and
/// the outcome of the last run.
///
/// Failures are caught here and kept as `error()` text; nothing escapes as a
/// fault. Retrying re-sends the last request as-is.
#[derive(Debug)]
pub struct PredictionForm {
    symbol: Option<SuggestionItem>,
    days_ahead: i64,
    period: Period,
    error: Option<String>,
    last_request: Option<PredictionRequest>,
    forecast: Option<Forecast>,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionForm {
    pub fn new() -> Self {
        Self {
            symbol: None,
            days_ahead: DEFAULT_DAYS_AHEAD,
            period: Period::default(),
            error: None,
            last_request: None,
            forecast: None,
        }
    }

    pub fn symbol(&self) -> Option<&SuggestionItem> {
        self.symbol.as_ref()
    }

    pub fn days_ahead(&self) -> i64 {
        self.days_ahead
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_request(&self) -> Option<&PredictionRequest> {
        self.last_request.as_ref()
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.forecast.as_ref()
    }

    pub fn select_symbol(&mut self, item: SuggestionItem) {
        self.symbol = Some(item);
    }

    /// Stores the typed value as-is; range problems surface on submit.
    pub fn set_days_ahead(&mut self, days: i64) {
        self.days_ahead = days;
    }

    pub fn increment_days(&mut self) {
        self.days_ahead = (self.days_ahead + 1).clamp(DAYS_AHEAD_MIN, DAYS_AHEAD_MAX);
    }

    pub fn decrement_days(&mut self) {
        self.days_ahead = (self.days_ahead - 1).clamp(DAYS_AHEAD_MIN, DAYS_AHEAD_MAX);
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn build_request(&self) -> Result<PredictionRequest, AppError> {
        let symbol = self
            .symbol
            .as_ref()
            .ok_or_else(|| AppError::Validation("Please select a stock symbol".to_string()))?;

        if !(DAYS_AHEAD_MIN..=DAYS_AHEAD_MAX).contains(&self.days_ahead) {
            return Err(AppError::Validation(format!(
                "Days ahead must be between {} and {}",
                DAYS_AHEAD_MIN, DAYS_AHEAD_MAX
            )));
        }

        Ok(PredictionRequest {
            symbol: symbol.symbol.clone(),
            days_ahead: self.days_ahead as u32,
            period: self.period,
        })
    }

    /// Validates the form and, if it passes, requests a forecast.
    pub async fn run(&mut self, backend: &dyn ForecastBackend) -> Result<&Forecast, AppError> {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.user_message());
                return Err(e);
            }
        };
        self.execute(backend, request).await
    }

    /// Re-issues the last request unchanged. Without one, behaves like `run`.
    pub async fn retry(&mut self, backend: &dyn ForecastBackend) -> Result<&Forecast, AppError> {
        self.error = None;
        match self.last_request.clone() {
            Some(request) => self.execute(backend, request).await,
            None => self.run(backend).await,
        }
    }

    async fn execute(
        &mut self,
        backend: &dyn ForecastBackend,
        request: PredictionRequest,
    ) -> Result<&Forecast, AppError> {
        self.error = None;
        self.last_request = Some(request.clone());

        match backend.predict(&request).await {
            Ok(response) => {
                let series = series_service::reconcile(&response);
                info!(
                    "Forecast ready for {}: {} points, boundary {:?}",
                    request.symbol,
                    series.len(),
                    series.boundary_date
                );
                let forecast: &Forecast = self.forecast.insert(Forecast {
                    symbol: request.symbol,
                    mae: response.mae,
                    rmse: response.rmse,
                    series,
                    historical_predicted_dates: response.historical_predicted_dates,
                    historical_predicted_prices: response.historical_predicted_prices,
                });
                Ok(forecast)
            }
            Err(e) => {
                warn!("Prediction for {} failed: {}", request.symbol, e);
                self.error = Some(e.user_message());
                Err(AppError::Api(e))
            }
        }
    }
}
