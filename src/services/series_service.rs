use std::iter;

use chrono::NaiveDate;

use crate::models::{ForecastRow, PredictionResponse, ReconciledSeries};

/// Lays history and forecast onto one date axis.
///
/// Dates are the historical dates followed by the future dates. `actual`
/// carries the historical prices, then `None` for every future date.
/// `boundary_date` is the first future date, or `None` without a forecast.
/// The input is only read, so equal responses always give equal series.
pub fn reconcile(response: &PredictionResponse) -> ReconciledSeries {
    let dates = response
        .historical_dates
        .iter()
        .chain(&response.future_dates)
        .copied()
        .collect();

    let actual = response
        .historical_prices
        .iter()
        .copied()
        .map(Some)
        .chain(iter::repeat(None).take(response.future_dates.len()))
        .collect();

    ReconciledSeries {
        dates,
        actual,
        predicted_future: response.future_predictions.clone(),
        boundary_date: response.future_dates.first().copied(),
    }
}

/// Pairs the trailing dates with the forecast values for the table.
pub fn forecast_rows(series: &ReconciledSeries) -> Vec<ForecastRow> {
    let n = series.predicted_future.len().min(series.dates.len());
    let start = series.dates.len() - n;

    series.dates[start..]
        .iter()
        .zip(&series.predicted_future)
        .map(|(date, price)| ForecastRow {
            date: *date,
            price: *price,
        })
        .collect()
}

/// Date range to shade as "forecast" on the chart.
pub fn boundary_span(series: &ReconciledSeries) -> Option<(NaiveDate, NaiveDate)> {
    let start = series.boundary_date?;
    let end = series.dates.last().copied()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days(offset)
    }

    fn response(history: usize, future: usize) -> PredictionResponse {
        PredictionResponse {
            historical_dates: (0..history as i64).map(day).collect(),
            historical_prices: (0..history).map(|i| 100.0 + i as f64).collect(),
            future_dates: (0..future as i64).map(|i| day(history as i64 + i)).collect(),
            future_predictions: (0..future).map(|i| 200.0 + i as f64).collect(),
            historical_predicted_dates: vec![],
            historical_predicted_prices: vec![],
            mae: Some(0.0125),
            rmse: Some(0.02),
        }
    }

    #[test]
    fn test_lengths_line_up() {
        for (history, future) in [(0, 0), (0, 3), (4, 0), (30, 15)] {
            let series = reconcile(&response(history, future));
            assert_eq!(series.dates.len(), history + future);
            assert_eq!(series.actual.len(), history + future);
            assert_eq!(series.predicted_future.len(), future);
        }
    }

    #[test]
    fn test_actual_is_none_exactly_over_forecast() {
        let series = reconcile(&response(3, 4));

        for (i, value) in series.actual.iter().enumerate() {
            assert_eq!(value.is_none(), i >= 3, "index {}", i);
        }
        assert_eq!(series.actual[0], Some(100.0));
    }

    #[test]
    fn test_two_history_five_future() {
        let input = response(2, 5);
        let series = reconcile(&input);

        assert_eq!(series.len(), 7);
        assert_eq!(
            series.actual,
            vec![Some(100.0), Some(101.0), None, None, None, None, None]
        );
        assert_eq!(series.boundary_date, Some(input.future_dates[0]));
        assert_eq!(series.dates[2], input.future_dates[0]);
    }

    #[test]
    fn test_no_forecast_means_no_boundary() {
        let series = reconcile(&response(5, 0));

        assert_eq!(series.boundary_date, None);
        assert!(series.predicted_future.is_empty());
        assert!(series.actual.iter().all(Option::is_some));
        assert_eq!(boundary_span(&series), None);
        assert!(forecast_rows(&series).is_empty());
    }

    #[test]
    fn test_idempotent_and_input_untouched() {
        let input = response(6, 3);
        let snapshot = input.clone();

        assert_eq!(reconcile(&input), reconcile(&input));
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_rows_and_span_cover_forecast() {
        let series = reconcile(&response(2, 3));

        let rows = forecast_rows(&series);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ForecastRow { date: day(2), price: 200.0 });
        assert_eq!(rows[2], ForecastRow { date: day(4), price: 202.0 });
        assert_eq!(boundary_span(&series), Some((day(2), day(4))));
    }
}
