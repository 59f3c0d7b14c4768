use serde::{Deserialize, Serialize};

// A symbol match returned by the backend search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub symbol: String,
    pub name: String,
}

impl SuggestionItem {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    /// Text placed in the search box once this item is committed.
    pub fn label(&self) -> String {
        format!("{} — {}", self.symbol, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_joins_symbol_and_name() {
        let item = SuggestionItem::new("AAPL", "Apple Inc.");
        assert_eq!(item.label(), "AAPL — Apple Inc.");
    }
}
