//! View metadata.

use serde::{Deserialize, Serialize};

use super::identifier::{ObjectType, TableIdentifier};
use super::source::SourceState;

/// A view: a table identifier fixed to [`ObjectType::View`] plus the
/// lazily loaded raw source expression (typically just the underlying
/// SELECT, exactly as persisted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// The view's identifier. Always carries `ObjectType::View`.
    pub identifier: TableIdentifier,

    /// Raw stored definition, loaded on demand.
    pub source: SourceState,
}

impl ViewDefinition {
    /// Wrap a table identifier as a view, forcing its object type tag.
    pub fn new(mut identifier: TableIdentifier) -> Self {
        identifier.object_type = ObjectType::View;
        Self {
            identifier,
            source: SourceState::NotLoaded,
        }
    }

    /// The view's display name.
    pub fn display_expression(&self) -> String {
        self.identifier.display_expression()
    }
}
