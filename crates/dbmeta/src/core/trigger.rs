//! Trigger metadata.

use serde::{Deserialize, Serialize};

use super::source::SourceState;

/// When the trigger fires relative to the triggering statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

/// A trigger defined on a table or view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    /// Trigger name.
    pub name: String,

    /// Name of the table or view the trigger is attached to.
    pub table_name: String,

    /// Firing time, where the catalog reports one.
    pub timing: Option<TriggerTiming>,

    /// Triggering events in catalog order (`INSERT`, `UPDATE`, `DELETE`).
    pub events: Vec<String>,

    /// Trigger body, loaded on demand.
    pub source: SourceState,
}

impl TriggerDefinition {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            timing: None,
            events: Vec::new(),
            source: SourceState::NotLoaded,
        }
    }
}

impl TriggerTiming {
    /// Parse the catalog spelling of a trigger timing.
    pub fn from_catalog(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BEFORE" => Some(TriggerTiming::Before),
            "AFTER" => Some(TriggerTiming::After),
            "INSTEAD OF" | "INSTEAD_OF" => Some(TriggerTiming::InsteadOf),
            _ => None,
        }
    }
}
