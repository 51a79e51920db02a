//! Foreign key metadata.

use serde::{Deserialize, Serialize};

/// Referential action attached to ON UPDATE / ON DELETE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FkRule {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

impl FkRule {
    /// Parse the catalog spelling of a referential action.
    pub fn from_catalog(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CASCADE" => FkRule::Cascade,
            "SET NULL" => FkRule::SetNull,
            "SET DEFAULT" => FkRule::SetDefault,
            "RESTRICT" => FkRule::Restrict,
            _ => FkRule::NoAction,
        }
    }
}

/// A foreign key constraint on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FkDefinition {
    /// Constraint name.
    pub constraint_name: String,

    /// Referencing columns, in key order.
    pub columns: Vec<String>,

    /// Referenced table name (schema-qualified where the catalog
    /// reports it that way).
    pub referenced_table: String,

    /// Referenced columns, in the same order as `columns`.
    pub referenced_columns: Vec<String>,

    /// ON UPDATE action.
    pub update_rule: FkRule,

    /// ON DELETE action.
    pub delete_rule: FkRule,
}

impl FkDefinition {
    pub fn new(constraint_name: impl Into<String>, referenced_table: impl Into<String>) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            columns: Vec::new(),
            referenced_table: referenced_table.into(),
            referenced_columns: Vec::new(),
            update_rule: FkRule::NoAction,
            delete_rule: FkRule::NoAction,
        }
    }

    /// Add one column pair in key order.
    pub fn add_column_pair(
        &mut self,
        column: impl Into<String>,
        referenced_column: impl Into<String>,
    ) {
        self.columns.push(column.into());
        self.referenced_columns.push(referenced_column.into());
    }
}
