//! Primary key definitions.

use serde::{Deserialize, Serialize};

/// One column of a primary key, with its position in the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkColumn {
    /// Column name.
    pub name: String,
    /// 1-based position of the column within the key.
    pub sequence: i32,
}

/// A table's primary key constraint.
///
/// Columns may be added in any order (drivers return key columns in
/// whatever order the catalog row scan produces); the externally visible
/// column list is always ordered by sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkDefinition {
    /// Constraint name.
    pub constraint_name: String,

    /// Name of the backing index, when the dialect reports one separately.
    index_name: Option<String>,

    /// Key columns, kept sorted by sequence.
    columns: Vec<PkColumn>,
}

impl PkDefinition {
    /// Create an empty primary key definition.
    pub fn new(constraint_name: impl Into<String>) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            index_name: None,
            columns: Vec::new(),
        }
    }

    /// Record the backing index name.
    pub fn set_index_name(&mut self, index_name: impl Into<String>) {
        self.index_name = Some(index_name.into());
    }

    /// The backing index name; defaults to the constraint name when the
    /// dialect did not report one.
    pub fn index_name(&self) -> &str {
        self.index_name.as_deref().unwrap_or(&self.constraint_name)
    }

    /// Add a key column. Insertion order is irrelevant; the column is
    /// placed by its sequence number.
    pub fn add_column(&mut self, name: impl Into<String>, sequence: i32) {
        let col = PkColumn {
            name: name.into(),
            sequence,
        };
        let pos = self
            .columns
            .partition_point(|c| c.sequence <= col.sequence);
        self.columns.insert(pos, col);
    }

    /// Key column names, ascending by sequence number.
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of key columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True if `column` participates in the key.
    pub fn contains(&self, column: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(column))
    }
}
