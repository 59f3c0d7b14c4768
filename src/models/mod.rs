mod prediction;
mod series;
mod suggestion;

pub use prediction::{Forecast, Period, PredictionRequest, PredictionResponse, DAYS_AHEAD_MAX, DAYS_AHEAD_MIN};
pub use series::{ForecastRow, ReconciledSeries};
pub use suggestion::SuggestionItem;
