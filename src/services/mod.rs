pub mod formatting;
pub mod prediction_service;
pub mod series_service;
