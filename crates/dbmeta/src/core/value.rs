//! Cell values exchanged with the connection boundary.
//!
//! Catalog queries only ever produce a handful of shapes (names, source
//! text, ordinal numbers, yes/no flags), so the value enum is deliberately
//! small. Bind parameters use the same type in the other direction.

use serde::{Deserialize, Serialize};

use crate::error::{MetaError, Result};

/// A single cell produced by (or bound into) a catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    /// SQL NULL.
    Null,
    /// Boolean flag (`is_nullable`, `is_deferrable`, ...).
    Bool(bool),
    /// Integer cell (ordinal positions, sizes, type codes, counts).
    Int(i64),
    /// Text cell (names, expressions, source fragments).
    Text(String),
}

impl MetaValue {
    /// True if the cell is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }

    /// Borrow the cell as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interpret the cell as an integer if possible.
    ///
    /// Numeric text cells are parsed; some drivers return every catalog
    /// column as text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Int(v) => Some(*v),
            MetaValue::Bool(b) => Some(i64::from(*b)),
            MetaValue::Text(s) => s.trim().parse().ok(),
            MetaValue::Null => None,
        }
    }

    /// Interpret the cell as a boolean if possible.
    ///
    /// Accepts the catalog spellings actually seen in the wild: native
    /// booleans, 0/1, and YES/NO / Y/N / true/false text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            MetaValue::Int(v) => Some(*v != 0),
            MetaValue::Text(s) => match s.trim().to_ascii_uppercase().as_str() {
                "YES" | "Y" | "TRUE" | "T" | "1" => Some(true),
                "NO" | "N" | "FALSE" | "F" | "0" => Some(false),
                _ => None,
            },
            MetaValue::Null => None,
        }
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<i32> for MetaValue {
    fn from(v: i32) -> Self {
        MetaValue::Int(v as i64)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

impl<T: Into<MetaValue>> From<Option<T>> for MetaValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => MetaValue::Null,
        }
    }
}

/// One row of a catalog query result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<MetaValue>,
}

impl Row {
    /// Build a row from its cells.
    pub fn new(cells: Vec<MetaValue>) -> Self {
        Self { cells }
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw cell access; NULL for out-of-range indexes so that readers can
    /// tolerate dialects returning fewer columns than the template names.
    pub fn cell(&self, idx: usize) -> &MetaValue {
        static NULL: MetaValue = MetaValue::Null;
        self.cells.get(idx).unwrap_or(&NULL)
    }

    /// Text cell, or None when NULL/absent.
    pub fn opt_str(&self, idx: usize) -> Option<&str> {
        self.cell(idx).as_str()
    }

    /// Text cell, trimmed of trailing catalog padding, or None.
    ///
    /// CHAR-typed catalog columns (DB2, Firebird) pad values with blanks.
    pub fn opt_trimmed(&self, idx: usize) -> Option<String> {
        self.cell(idx).as_str().map(|s| s.trim_end().to_string())
    }

    /// Required text cell.
    pub fn get_str(&self, idx: usize) -> Result<&str> {
        self.opt_str(idx).ok_or_else(|| {
            MetaError::execution(
                "reading result row",
                format!("expected text in column {}, got {:?}", idx, self.cell(idx)),
            )
        })
    }

    /// Integer cell with a zero default for NULL/absent.
    pub fn get_i64_or_zero(&self, idx: usize) -> i64 {
        self.cell(idx).as_i64().unwrap_or(0)
    }

    /// Boolean cell with a `false` default for NULL/absent.
    pub fn get_bool_or_false(&self, idx: usize) -> bool {
        self.cell(idx).as_bool().unwrap_or(false)
    }
}

impl From<Vec<MetaValue>> for Row {
    fn from(cells: Vec<MetaValue>) -> Self {
        Row::new(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_spellings() {
        assert_eq!(MetaValue::Text("YES".into()).as_bool(), Some(true));
        assert_eq!(MetaValue::Text("n".into()).as_bool(), Some(false));
        assert_eq!(MetaValue::Int(1).as_bool(), Some(true));
        assert_eq!(MetaValue::Null.as_bool(), None);
        assert_eq!(MetaValue::Text("maybe".into()).as_bool(), None);
    }

    #[test]
    fn test_numeric_text_parses() {
        assert_eq!(MetaValue::Text(" 42 ".into()).as_i64(), Some(42));
        assert_eq!(MetaValue::Int(7).as_i64(), Some(7));
        assert_eq!(MetaValue::Null.as_i64(), None);
    }

    #[test]
    fn test_row_out_of_range_is_null() {
        let row = Row::new(vec![MetaValue::Text("a".into())]);
        assert!(row.cell(5).is_null());
        assert_eq!(row.opt_str(5), None);
        assert_eq!(row.get_i64_or_zero(5), 0);
    }

    #[test]
    fn test_trimmed_strips_char_padding() {
        let row = Row::new(vec![MetaValue::Text("AMOUNT_POSITIVE   ".into())]);
        assert_eq!(row.opt_trimmed(0).as_deref(), Some("AMOUNT_POSITIVE"));
    }

    #[test]
    fn test_get_str_error_names_column() {
        let row = Row::new(vec![MetaValue::Null]);
        let err = row.get_str(0).unwrap_err();
        assert!(err.to_string().contains("column 0"));
    }
}
