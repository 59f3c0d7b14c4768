use chrono::NaiveDate;

pub const NOT_AVAILABLE: &str = "N/A";

/// Renders an error metric (a fraction) as a percentage.
///
/// Zero is a real score and renders as `0.00%`; only a missing or
/// non-finite value is "N/A".
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}
