use crate::models::SuggestionItem;

/// Keys the suggestion list reacts to. Everything else is `Other` and passes
/// through to the text input untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

/// Result of feeding one key to the list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The key was consumed and must not edit the input text.
    pub prevent_default: bool,
    pub committed: Option<SuggestionItem>,
}

impl KeyOutcome {
    fn consumed() -> Self {
        Self {
            prevent_default: true,
            committed: None,
        }
    }
}

/// Open/closed state of the suggestion list and its highlighted row.
///
/// `Open { active: None }` is the "nothing highlighted" state; ArrowUp from
/// the first row returns there instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Closed,
    Open { active: Option<usize> },
}

impl Selection {
    pub fn is_open(&self) -> bool {
        matches!(self, Selection::Open { .. })
    }

    pub fn active_index(&self) -> Option<usize> {
        match self {
            Selection::Open { active } => *active,
            Selection::Closed => None,
        }
    }

    /// A fresh list arrived. It only opens when there is something to show
    /// and the input has focus.
    pub fn on_suggestions(&mut self, count: usize, focused: bool) {
        *self = if count > 0 && focused {
            Selection::Open { active: None }
        } else {
            Selection::Closed
        };
    }

    pub fn close(&mut self) {
        *self = Selection::Closed;
    }

    pub fn on_key(&mut self, key: Key, suggestions: &[SuggestionItem]) -> KeyOutcome {
        let Selection::Open { active } = *self else {
            return KeyOutcome::default();
        };
        if suggestions.is_empty() {
            return KeyOutcome::default();
        }
        let last = suggestions.len() - 1;

        match key {
            Key::ArrowDown => {
                let next = match active {
                    None => 0,
                    Some(i) => (i + 1).min(last),
                };
                *self = Selection::Open { active: Some(next) };
                KeyOutcome::consumed()
            }
            Key::ArrowUp => {
                let prev = match active {
                    None | Some(0) => None,
                    Some(i) => Some((i - 1).min(last)),
                };
                *self = Selection::Open { active: prev };
                KeyOutcome::consumed()
            }
            Key::Enter => match active {
                Some(i) => KeyOutcome {
                    prevent_default: true,
                    committed: self.commit(suggestions, i),
                },
                None => KeyOutcome::default(),
            },
            Key::Escape => {
                self.close();
                KeyOutcome::consumed()
            }
            Key::Other => KeyOutcome::default(),
        }
    }

    /// Commits the item at `index`, closing the list. Used for Enter and for
    /// pointer picks alike.
    pub fn commit(&mut self, suggestions: &[SuggestionItem], index: usize) -> Option<SuggestionItem> {
        let item = suggestions.get(index)?.clone();
        self.close();
        Some(item)
    }
}
