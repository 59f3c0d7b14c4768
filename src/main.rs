use std::sync::Arc;

use stockcast::app::App;
use stockcast::config::ClientConfig;
use stockcast::external::{ForecastBackend, HttpForecastBackend};
use stockcast::logging::{init_logging, LoggingConfig};
use stockcast::state::AppState;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env()).map_err(|e| anyhow::anyhow!(e))?;

    let config = ClientConfig::from_env()?;
    tracing::info!(
        "🚀 Forecast backend at {} (search debounce {:?})",
        config.api_base_url,
        config.search_debounce
    );

    let backend: Arc<dyn ForecastBackend> = Arc::new(HttpForecastBackend::from_config(&config)?);
    let state = AppState { backend, config };

    App::new(state).run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}
