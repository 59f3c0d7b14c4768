use chrono::NaiveDate;
use serde::Serialize;

/// History and forecast laid out on one date axis.
///
/// `actual` holds `None` over the forecast horizon so a chart can break the
/// actual-price line where the forecast begins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledSeries {
    pub dates: Vec<NaiveDate>,
    pub actual: Vec<Option<f64>>,
    pub predicted_future: Vec<f64>,
    pub boundary_date: Option<NaiveDate>,
}

impl ReconciledSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

// One line of the forecast table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub price: f64,
}
