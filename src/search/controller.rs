use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::external::{ApiError, ForecastBackend};
use crate::models::SuggestionItem;
use crate::search::debounce::Debouncer;
use crate::search::selection::{Key, KeyOutcome};
use crate::search::session::{LookupOutcome, LookupTicket, QueryChange, SearchSession};

type LookupResult = (u64, Result<Vec<SuggestionItem>, ApiError>);

/// What changed after an asynchronous completion was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchUpdate {
    LookupIssued { token: u64, query: String },
    Cleared,
    Suggestions { token: u64, count: usize },
    LookupFailed { token: u64 },
    Discarded { token: u64 },
}

/// Drives one search box: debounces input, runs lookups, and applies their
/// results strictly in token order.
///
/// Synchronous events (typing, keys, focus) are handled immediately. Timer
/// and network completions are applied one at a time by [`next_update`],
/// which the owner awaits alongside its other event sources.
///
/// [`next_update`]: SearchController::next_update
pub struct SearchController {
    session: SearchSession,
    debouncer: Debouncer<String>,
    backend: Arc<dyn ForecastBackend>,
    in_flight: JoinSet<LookupResult>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn ForecastBackend>, debounce: Duration) -> Self {
        Self {
            session: SearchSession::new(),
            debouncer: Debouncer::new(debounce),
            backend,
            in_flight: JoinSet::new(),
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn input(&mut self, text: impl Into<String>) {
        if self.session.is_disposed() {
            return;
        }
        let text = text.into();
        self.session.on_input(text.clone());
        self.debouncer.observe(text);
    }

    pub fn key(&mut self, key: Key) -> KeyOutcome {
        let outcome = self.session.on_key(key);
        if let Some(item) = &outcome.committed {
            self.after_commit(item);
        }
        outcome
    }

    pub fn pick(&mut self, index: usize) -> Option<SuggestionItem> {
        let item = self.session.on_pick(index)?;
        self.after_commit(&item);
        Some(item)
    }

    pub fn focus(&mut self) {
        self.session.on_focus();
    }

    pub fn blur(&mut self) {
        self.session.on_blur();
    }

    /// Waits for the next debounce or lookup completion and applies it.
    ///
    /// Returns `None` once the controller is disposed or has nothing left
    /// that could ever complete.
    pub async fn next_update(&mut self) -> Option<SearchUpdate> {
        if self.session.is_disposed() {
            return None;
        }

        loop {
            tokio::select! {
                Some(query) = self.debouncer.fired() => {
                    match self.session.on_debounced_query(query) {
                        QueryChange::Lookup(ticket) => {
                            let update = SearchUpdate::LookupIssued {
                                token: ticket.token,
                                query: ticket.query.clone(),
                            };
                            self.spawn_lookup(ticket);
                            return Some(update);
                        }
                        QueryChange::Cleared => return Some(SearchUpdate::Cleared),
                        QueryChange::Unchanged => {}
                    }
                }
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok((token, result)) => return Some(self.apply(token, result)),
                        Err(e) => warn!(session = %self.session.id(), "Lookup task ended abnormally: {}", e),
                    }
                }
                else => return None,
            }
        }
    }

    /// Cancels the pending debounce and retires every in-flight lookup.
    pub fn dispose(&mut self) {
        if self.session.is_disposed() {
            return;
        }
        self.debouncer.cancel();
        self.in_flight.abort_all();
        self.session.dispose();
        info!(session = %self.session.id(), "Search session disposed");
    }

    fn spawn_lookup(&mut self, ticket: LookupTicket) {
        let backend = Arc::clone(&self.backend);
        self.in_flight.spawn(async move {
            let result = backend.search_symbols(&ticket.query).await;
            (ticket.token, result)
        });
    }

    fn apply(&mut self, token: u64, result: Result<Vec<SuggestionItem>, ApiError>) -> SearchUpdate {
        match self.session.on_lookup_resolved(token, result) {
            LookupOutcome::Applied { count } => SearchUpdate::Suggestions { token, count },
            LookupOutcome::Failed => SearchUpdate::LookupFailed { token },
            LookupOutcome::Stale => SearchUpdate::Discarded { token },
        }
    }

    // The box now shows the committed label; nothing should search for it.
    fn after_commit(&mut self, item: &SuggestionItem) {
        self.debouncer.cancel();
        self.session.show_committed(item);
        info!(session = %self.session.id(), "Selected {}", item.symbol);
    }
}
