use std::sync::Arc;

use crate::config::ClientConfig;
use crate::external::ForecastBackend;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ForecastBackend>,
    pub config: ClientConfig,
}
