use tracing::{debug, warn};
use uuid::Uuid;

use crate::external::ApiError;
use crate::models::SuggestionItem;
use crate::search::selection::{Key, KeyOutcome, Selection};

/// A lookup the session wants performed. `token` identifies it when the
/// result comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub token: u64,
    pub query: String,
}

/// What a debounced query asks of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    Lookup(LookupTicket),
    /// Blank query: results were dropped, nothing to fetch.
    Cleared,
    /// Same value as last time, or the session is gone.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Applied { count: usize },
    Failed,
    /// A newer lookup superseded this one; nothing changed.
    Stale,
}

/// State of one search box, mutated only through the transition methods.
///
/// Invariants:
/// - `active_index()` is `None` or a valid index into `suggestions()`.
/// - the list is open only while `suggestions()` is non-empty.
/// - only the lookup carrying the current `request_token()` may write results.
#[derive(Debug)]
pub struct SearchSession {
    id: Uuid,
    query: String,
    debounced_query: String,
    suggestions: Vec<SuggestionItem>,
    selection: Selection,
    focused: bool,
    is_loading: bool,
    request_token: u64,
    disposed: bool,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            query: String::new(),
            debounced_query: String::new(),
            suggestions: Vec::new(),
            selection: Selection::Closed,
            focused: false,
            is_loading: false,
            request_token: 0,
            disposed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced_query
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_open()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.selection.active_index()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn request_token(&self) -> u64 {
        self.request_token
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// A keystroke replaced the input text. Typing implies focus.
    pub fn on_input(&mut self, text: String) {
        self.focused = true;
        self.query = text;
        if self.query.is_empty() {
            self.clear_results();
        }
    }

    /// The debounce published a stable query. Only a change from the last
    /// published value has any effect.
    pub fn on_debounced_query(&mut self, query: String) -> QueryChange {
        if self.disposed || query == self.debounced_query {
            return QueryChange::Unchanged;
        }

        let trimmed = query.trim().to_string();
        if trimmed.is_empty() {
            self.clear_results();
            self.debounced_query = query;
            return QueryChange::Cleared;
        }

        self.debounced_query = query;
        self.request_token += 1;
        self.is_loading = true;
        debug!(session = %self.id, token = self.request_token, "Issuing lookup for '{}'", trimmed);

        QueryChange::Lookup(LookupTicket {
            token: self.request_token,
            query: trimmed,
        })
    }

    /// A lookup finished. Results are applied in token order: anything but
    /// the latest token is dropped without touching state.
    pub fn on_lookup_resolved(
        &mut self,
        token: u64,
        result: Result<Vec<SuggestionItem>, ApiError>,
    ) -> LookupOutcome {
        if self.disposed || token != self.request_token {
            debug!(session = %self.id, token, current = self.request_token, "Discarding stale lookup");
            return LookupOutcome::Stale;
        }

        self.is_loading = false;
        match result {
            Ok(items) => {
                let count = items.len();
                self.suggestions = items;
                self.selection.on_suggestions(count, self.focused);
                LookupOutcome::Applied { count }
            }
            Err(e) => {
                // Autocomplete failures never reach the user
                warn!(session = %self.id, token, "Symbol lookup failed: {}", e);
                self.suggestions.clear();
                self.selection.close();
                LookupOutcome::Failed
            }
        }
    }

    pub fn on_key(&mut self, key: Key) -> KeyOutcome {
        self.selection.on_key(key, &self.suggestions)
    }

    /// Pointer selection of the row at `index`. Only visible rows can be
    /// picked.
    pub fn on_pick(&mut self, index: usize) -> Option<SuggestionItem> {
        if !self.selection.is_open() {
            return None;
        }
        self.selection.commit(&self.suggestions, index)
    }

    /// Reopens a closed list; an open one keeps its highlight.
    pub fn on_focus(&mut self) {
        self.focused = true;
        if !self.selection.is_open() && !self.suggestions.is_empty() {
            self.selection.on_suggestions(self.suggestions.len(), true);
        }
    }

    pub fn on_blur(&mut self) {
        self.focused = false;
        self.selection.close();
    }

    /// Shows a committed symbol in the input without searching for it.
    pub fn show_committed(&mut self, item: &SuggestionItem) {
        self.clear_results();
        self.query = item.label();
        self.debounced_query = self.query.clone();
    }

    /// Tears the session down. Lookups still in flight become permanently stale.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.request_token += 1;
        self.is_loading = false;
        self.suggestions.clear();
        self.selection.close();
    }

    // Also retires any in-flight token so a late result cannot reopen the
    // list, and forgets the last query so retyping it searches again.
    fn clear_results(&mut self) {
        if self.is_loading {
            self.request_token += 1;
        }
        self.is_loading = false;
        self.debounced_query.clear();
        self.suggestions.clear();
        self.selection.close();
    }
}
