use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::series::ReconciledSeries;

pub const DAYS_AHEAD_MIN: i64 = 1;
pub const DAYS_AHEAD_MAX: i64 = 15;

/// Amount of price history the backend trains on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1y")]
    OneYear,
    #[default]
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::OneYear, Period::FiveYears, Period::TenYears];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::OneYear => "1 Year",
            Period::FiveYears => "5 Years",
            Period::TenYears => "10 Years",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown period '{}'. Use 1y, 5y or 10y", s.trim()))
    }
}

// Body of POST /api/predict. Built once per run and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    #[serde(rename = "ticker")]
    pub symbol: String,
    pub days_ahead: u32,
    pub period: Period,
}

/// The `results` object of a successful prediction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    pub historical_dates: Vec<NaiveDate>,
    pub historical_prices: Vec<f64>,
    pub future_dates: Vec<NaiveDate>,
    pub future_predictions: Vec<f64>,
    #[serde(rename = "hist_pred_dates", default)]
    pub historical_predicted_dates: Vec<NaiveDate>,
    #[serde(rename = "hist_pred_prices", default)]
    pub historical_predicted_prices: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_metric")]
    pub mae: Option<f64>,
    #[serde(default, deserialize_with = "lenient_metric")]
    pub rmse: Option<f64>,
}

impl PredictionResponse {
    /// Checks the segment invariants the reconciler relies on.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.historical_dates.len() != self.historical_prices.len() {
            return Err(format!(
                "historical segment has {} dates but {} prices",
                self.historical_dates.len(),
                self.historical_prices.len()
            ));
        }
        if self.future_dates.len() != self.future_predictions.len() {
            return Err(format!(
                "future segment has {} dates but {} predictions",
                self.future_dates.len(),
                self.future_predictions.len()
            ));
        }
        if !strictly_increasing(&self.historical_dates) {
            return Err("historical dates are not strictly increasing".to_string());
        }
        if !strictly_increasing(&self.future_dates) {
            return Err("future dates are not strictly increasing".to_string());
        }
        if let (Some(last), Some(first)) = (self.historical_dates.last(), self.future_dates.first()) {
            if first <= last {
                return Err(format!(
                    "first future date {} is not after last historical date {}",
                    first, last
                ));
            }
        }
        Ok(())
    }
}

fn strictly_increasing(dates: &[NaiveDate]) -> bool {
    dates.windows(2).all(|w| w[0] < w[1])
}

// Absent, null or non-numeric metrics all become None.
fn lenient_metric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

/// Everything the chart and table need for one completed prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub symbol: String,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub series: ReconciledSeries,
    pub historical_predicted_dates: Vec<NaiveDate>,
    pub historical_predicted_prices: Vec<f64>,
}
