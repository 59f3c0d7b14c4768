use crate::models::{Forecast, Period};
use crate::search::SearchSession;
use crate::services::formatting::{format_long_date, format_metric, format_price};
use crate::services::series_service::{boundary_span, forecast_rows};

/// The open suggestion list, one row per item, highlighted row marked `>`.
pub fn suggestions(session: &SearchSession) -> Vec<String> {
    if !session.is_open() {
        return Vec::new();
    }

    session
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if session.active_index() == Some(i) { '>' } else { ' ' };
            format!("{} {:>2}. {}", marker, i + 1, item.label())
        })
        .collect()
}

pub fn forecast(forecast: &Forecast) -> Vec<String> {
    let mut lines = vec![
        format!("{} Stock Forecast & Model Fit", forecast.symbol),
        format!(
            "Model Fit (MAE): {}   Model Fit (RMSE): {}",
            format_metric(forecast.mae),
            format_metric(forecast.rmse)
        ),
    ];

    let series = &forecast.series;
    let history = series.actual.iter().filter(|v| v.is_some()).count();
    match boundary_span(series) {
        Some((start, end)) => lines.push(format!(
            "{} historical points, forecast from {} to {}",
            history, start, end
        )),
        None => lines.push(format!("{} historical points, no forecast horizon", history)),
    }

    let rows = forecast_rows(series);
    if !rows.is_empty() {
        lines.push(format!("{}-Day Forecast", rows.len()));
        for row in rows {
            lines.push(format!(
                "  {:<20} {:>12}",
                format_long_date(row.date),
                format_price(row.price)
            ));
        }
    }
    lines
}

pub fn period(period: Period) -> String {
    format!("History period: {}", period.label())
}

pub fn help() -> Vec<String> {
    [
        "Type to search for a ticker (e.g. AAPL; NSE stocks end in .NS).",
        "  :down / :up     move the highlight      :enter   select highlighted",
        "  :pick N         select row N            :esc     close the list",
        "  :focus / :blur  focus or leave the box",
        "  :days N         days ahead (1-15)       :more / :less   step days",
        "  :period P       history period: 1y, 5y, 10y",
        "  :run            run the prediction      :retry   repeat the last run",
        "  :help           this text               :quit    exit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
