//! Ticker autocomplete and forecast reconciliation for a stock prediction
//! front end.

pub mod app;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod render;
pub mod search;
pub mod services;
pub mod state;
