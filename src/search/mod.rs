//! Autocomplete for ticker symbols.
//!
//! Keystrokes flow through [`Debouncer`] into the [`SearchSession`] reducer,
//! which hands out token-stamped lookups; [`SearchController`] runs them and
//! feeds results back so only the newest query's list is ever shown.

pub mod controller;
pub mod debounce;
pub mod selection;
pub mod session;

pub use controller::{SearchController, SearchUpdate};
pub use debounce::Debouncer;
pub use selection::{Key, KeyOutcome, Selection};
pub use session::{LookupOutcome, LookupTicket, QueryChange, SearchSession};
