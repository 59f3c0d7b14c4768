use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::{Period, SuggestionItem};
use crate::render;
use crate::search::{Key, SearchController, SearchUpdate};
use crate::services::prediction_service::PredictionForm;
use crate::state::AppState;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replaces the search box text.
    Type(String),
    Key(Key),
    /// Pointer pick, zero-based.
    Pick(usize),
    Focus,
    Blur,
    Days(i64),
    MoreDays,
    FewerDays,
    Period(Period),
    Run,
    Retry,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches('\r');
        let Some(rest) = line.trim().strip_prefix(':') else {
            return Ok(Command::Type(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();

        let command = match (name.as_str(), arg) {
            ("down", None) => Command::Key(Key::ArrowDown),
            ("up", None) => Command::Key(Key::ArrowUp),
            ("enter", None) => Command::Key(Key::Enter),
            ("esc", None) => Command::Key(Key::Escape),
            ("pick", Some(n)) => match n.parse::<usize>() {
                Ok(row) if row >= 1 => Command::Pick(row - 1),
                _ => return Err(AppError::Validation(format!("Invalid row '{}'", n))),
            },
            ("focus", None) => Command::Focus,
            ("blur", None) => Command::Blur,
            ("days", Some(n)) => Command::Days(
                n.parse()
                    .map_err(|_| AppError::Validation(format!("Invalid number of days '{}'", n)))?,
            ),
            ("more", None) => Command::MoreDays,
            ("less", None) => Command::FewerDays,
            ("period", Some(p)) => Command::Period(p.parse()?),
            ("run", None) => Command::Run,
            ("retry", None) => Command::Retry,
            ("help", None) => Command::Help,
            ("quit", None) | ("q", None) => Command::Quit,
            _ => return Err(AppError::Validation(format!("Unknown command ':{}'. Try :help", rest.trim()))),
        };
        Ok(command)
    }
}

/// The search box and the prediction form on one screen.
pub struct App {
    state: AppState,
    search: SearchController,
    form: PredictionForm,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let search = SearchController::new(state.backend.clone(), state.config.search_debounce);
        Self {
            state,
            search,
            form: PredictionForm::new(),
        }
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchController {
        &mut self.search
    }

    pub fn form(&self) -> &PredictionForm {
        &self.form
    }

    /// Handles one command and returns the lines to print.
    pub async fn dispatch(&mut self, command: Command) -> Vec<String> {
        debug!("Dispatching {:?}", command);
        match command {
            Command::Type(text) => {
                self.search.input(text);
                Vec::new()
            }
            Command::Key(key) => {
                let outcome = self.search.key(key);
                match outcome.committed {
                    Some(item) => self.commit(item),
                    None => render::suggestions(self.search.session()),
                }
            }
            Command::Pick(index) => match self.search.pick(index) {
                Some(item) => self.commit(item),
                None => vec![format!("No suggestion in row {}", index + 1)],
            },
            Command::Focus => {
                self.search.focus();
                render::suggestions(self.search.session())
            }
            Command::Blur => {
                self.search.blur();
                Vec::new()
            }
            Command::Days(days) => {
                self.form.set_days_ahead(days);
                vec![format!("Days ahead: {}", self.form.days_ahead())]
            }
            Command::MoreDays => {
                self.form.increment_days();
                vec![format!("Days ahead: {}", self.form.days_ahead())]
            }
            Command::FewerDays => {
                self.form.decrement_days();
                vec![format!("Days ahead: {}", self.form.days_ahead())]
            }
            Command::Period(period) => {
                self.form.set_period(period);
                vec![render::period(period)]
            }
            Command::Run => {
                let result = self.form.run(self.state.backend.as_ref()).await;
                prediction_lines(result)
            }
            Command::Retry => {
                let result = self.form.retry(self.state.backend.as_ref()).await;
                prediction_lines(result)
            }
            Command::Help => render::help(),
            Command::Quit => Vec::new(),
        }
    }

    /// Lines to print after the search controller applied a completion.
    /// Failed and discarded lookups stay silent.
    pub fn on_search_update(&self, update: &SearchUpdate) -> Vec<String> {
        match update {
            SearchUpdate::Suggestions { count: 0, .. } => {
                vec![format!("No matches for '{}'", self.search.session().debounced_query().trim())]
            }
            SearchUpdate::Suggestions { .. } => render::suggestions(self.search.session()),
            SearchUpdate::LookupIssued { .. }
            | SearchUpdate::Cleared
            | SearchUpdate::LookupFailed { .. }
            | SearchUpdate::Discarded { .. } => Vec::new(),
        }
    }

    /// Reads commands until `:quit` or end of input, applying search
    /// completions as they arrive in between.
    pub async fn run<R>(mut self, input: R) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        print_lines(&render::help());

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match line.parse::<Command>() {
                        Ok(Command::Quit) => break,
                        Ok(command) => print_lines(&self.dispatch(command).await),
                        Err(e) => println!("⚠ {}", e.user_message()),
                    }
                }
                Some(update) = self.search.next_update() => {
                    print_lines(&self.on_search_update(&update));
                }
            }
        }

        self.search.dispose();
        info!("Session closed");
        Ok(())
    }

    fn commit(&mut self, item: SuggestionItem) -> Vec<String> {
        let line = format!("Selected {}", item.label());
        self.form.select_symbol(item);
        vec![line]
    }
}

fn prediction_lines(result: Result<&crate::models::Forecast, AppError>) -> Vec<String> {
    match result {
        Ok(forecast) => render::forecast(forecast),
        Err(e @ AppError::Validation(_)) => vec![format!("⚠ {}", e.user_message())],
        Err(e) => vec![format!("⚠ {} (type :retry to try again)", e.user_message())],
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;

    use crate::config::ClientConfig;
    use crate::external::forecast_backend::testing::StubBackend;
    use crate::external::ApiError;
    use crate::models::PredictionResponse;

    fn app_with(backend: StubBackend) -> (App, Arc<StubBackend>) {
        let backend = Arc::new(backend);
        let mut config = ClientConfig::from_lookup(|_| None).unwrap();
        config.search_debounce = Duration::from_millis(300);
        let state = AppState {
            backend: backend.clone(),
            config,
        };
        (App::new(state), backend)
    }

    fn response(history: usize, future: usize) -> PredictionResponse {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let day = |i: usize| start + chrono::Duration::days(i as i64);
        PredictionResponse {
            historical_dates: (0..history).map(day).collect(),
            historical_prices: (0..history).map(|i| 180.0 + i as f64).collect(),
            future_dates: (history..history + future).map(day).collect(),
            future_predictions: (0..future).map(|i| 190.0 + i as f64).collect(),
            historical_predicted_dates: vec![],
            historical_predicted_prices: vec![],
            mae: Some(0.0),
            rmse: None,
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("AAP".parse::<Command>().unwrap(), Command::Type("AAP".into()));
        assert_eq!(" :down ".parse::<Command>().unwrap(), Command::Key(Key::ArrowDown));
        assert_eq!(":pick 2".parse::<Command>().unwrap(), Command::Pick(1));
        assert_eq!(":days 5".parse::<Command>().unwrap(), Command::Days(5));
        assert_eq!(":period 10y".parse::<Command>().unwrap(), Command::Period(Period::TenYears));
        assert_eq!(":RUN".parse::<Command>().unwrap(), Command::Run);
        assert_eq!("".parse::<Command>().unwrap(), Command::Type(String::new()));
    }

    #[test]
    fn test_parse_rejects_bad_commands() {
        assert!(":pick 0".parse::<Command>().is_err());
        assert!(":days many".parse::<Command>().is_err());
        assert!(":period 3y".parse::<Command>().is_err());
        assert!(":launch".parse::<Command>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_select_and_run() {
        let (mut app, backend) = app_with(
            StubBackend::default()
                .with_results("AAP", vec![SuggestionItem::new("AAPL", "Apple Inc.")])
                .answering(Ok(response(2, 5))),
        );

        app.dispatch(Command::Type("AAP".into())).await;
        app.search_mut().next_update().await;
        let update = app.search_mut().next_update().await.unwrap();
        assert_eq!(app.on_search_update(&update), vec!["   1. AAPL — Apple Inc.".to_string()]);

        assert_eq!(
            app.dispatch(Command::Key(Key::ArrowDown)).await,
            vec![">  1. AAPL — Apple Inc.".to_string()]
        );
        assert_eq!(
            app.dispatch(Command::Key(Key::Enter)).await,
            vec!["Selected AAPL — Apple Inc.".to_string()]
        );

        app.dispatch(Command::Days(5)).await;
        app.dispatch(Command::Period(Period::OneYear)).await;
        let lines = app.dispatch(Command::Run).await;

        assert_eq!(lines[0], "AAPL Stock Forecast & Model Fit");
        assert_eq!(lines[1], "Model Fit (MAE): 0.00%   Model Fit (RMSE): N/A");
        assert!(lines.iter().any(|l| l == "5-Day Forecast"));
        assert_eq!(app.form().forecast().unwrap().series.len(), 7);
        assert_eq!(backend.predict_calls()[0].days_ahead, 5);
    }

    #[tokio::test]
    async fn test_run_without_symbol_shows_inline_error() {
        let (mut app, backend) = app_with(StubBackend::default());

        let lines = app.dispatch(Command::Run).await;
        assert_eq!(lines, vec!["⚠ Please select a stock symbol".to_string()]);
        assert!(backend.predict_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_offers_retry() {
        let (mut app, _) = app_with(
            StubBackend::default()
                .with_results("MSFT", vec![SuggestionItem::new("MSFT", "Microsoft Corporation")])
                .answering(Err(ApiError::Network("connection refused".into()))),
        );

        app.dispatch(Command::Type("MSFT".into())).await;
        app.search_mut().next_update().await;
        app.search_mut().next_update().await;
        app.dispatch(Command::Pick(0)).await;

        let lines = app.dispatch(Command::Run).await;
        assert_eq!(
            lines,
            vec!["⚠ Failed to fetch prediction. Please try again. (type :retry to try again)".to_string()]
        );
    }
}
