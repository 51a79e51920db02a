//! Lazily loaded source text.

use serde::{Deserialize, Serialize};

/// The loading state of an on-demand source text (view definition,
/// routine body, trigger body).
///
/// "Not yet loaded" and "not available on this dialect" are distinct
/// states: the first invites a load attempt, the second tells the caller
/// to display "unavailable" and move on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceState {
    /// No load has been attempted yet.
    #[default]
    NotLoaded,
    /// The source text, exactly as stored in the catalog.
    Loaded(String),
    /// The current dialect has no way to retrieve this source.
    Unavailable,
}

impl SourceState {
    /// The loaded text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            SourceState::Loaded(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True once a load attempt has concluded, successfully or not.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, SourceState::NotLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_loaded_and_unavailable_are_distinct() {
        assert_ne!(SourceState::NotLoaded, SourceState::Unavailable);
        assert!(!SourceState::NotLoaded.is_resolved());
        assert!(SourceState::Unavailable.is_resolved());
        assert_eq!(SourceState::Unavailable.text(), None);
    }

    #[test]
    fn test_loaded_exposes_text() {
        let s = SourceState::Loaded("select 1".into());
        assert_eq!(s.text(), Some("select 1"));
        assert!(s.is_resolved());
    }
}
