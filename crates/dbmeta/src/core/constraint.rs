//! Check constraint expressions.

use serde::{Deserialize, Serialize};

/// Where a check constraint is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintScope {
    /// Defined at table level.
    Table,
    /// Defined on a single column; carries the owning column name.
    Column(String),
}

/// A check constraint, normalized to a complete `CHECK (...)` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintExpression {
    /// Constraint name; some dialects only store anonymous constraints.
    pub name: Option<String>,

    /// The boolean expression text, decorated so it reads as a valid
    /// `CHECK (...)` clause.
    pub expression: String,

    /// Table-level or column-level.
    pub scope: ConstraintScope,
}

impl ConstraintExpression {
    /// A table-level constraint.
    pub fn table_level(name: Option<String>, expression: impl Into<String>) -> Self {
        Self {
            name,
            expression: expression.into(),
            scope: ConstraintScope::Table,
        }
    }

    /// A column-level constraint on `column`.
    pub fn column_level(
        name: Option<String>,
        column: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            name,
            expression: expression.into(),
            scope: ConstraintScope::Column(column.into()),
        }
    }

    /// The owning column name for column-scoped constraints.
    pub fn column(&self) -> Option<&str> {
        match &self.scope {
            ConstraintScope::Column(c) => Some(c.as_str()),
            ConstraintScope::Table => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes() {
        let t = ConstraintExpression::table_level(Some("chk_amount".into()), "check (amount > 0)");
        assert_eq!(t.column(), None);

        let c = ConstraintExpression::column_level(None, "amount", "check (amount > 0)");
        assert_eq!(c.column(), Some("amount"));
        assert_eq!(c.name, None);
    }
}
