pub mod forecast_backend;
pub mod http_backend;

pub use forecast_backend::{ApiError, ForecastBackend};
pub use http_backend::HttpForecastBackend;
