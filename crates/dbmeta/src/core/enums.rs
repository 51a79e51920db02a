//! Enumerated type metadata.

use serde::{Deserialize, Serialize};

/// A discovered enumerated type with its ordered label values.
///
/// One instance is created per discovered type. Labels may be appended
/// incrementally (one catalog row at a time) or replaced wholesale;
/// replacement copies the given labels into a fresh list so the
/// identifier never aliases a caller-owned Vec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumIdentifier {
    /// Catalog qualifier, where the dialect has one.
    pub catalog: Option<String>,

    /// Schema qualifier, where the dialect has one.
    pub schema: Option<String>,

    /// Type name.
    pub name: String,

    /// Ordered label values.
    values: Vec<String>,

    /// Free-text remark from the catalog, if any.
    pub comment: Option<String>,
}

impl EnumIdentifier {
    /// An enum type with no labels yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
            values: Vec::new(),
            comment: None,
        }
    }

    /// Append one label in catalog order.
    pub fn add_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    /// Replace all labels. The slice is copied; the caller's storage is
    /// never aliased.
    pub fn set_values(&mut self, values: &[String]) {
        self.values = values.to_vec();
    }

    /// The ordered label values.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incremental_append_keeps_order() {
        let mut e = EnumIdentifier::new("order_status");
        e.add_value("new");
        e.add_value("shipped");
        e.add_value("cancelled");
        assert_eq!(e.values(), ["new", "shipped", "cancelled"]);
    }

    #[test]
    fn test_bulk_replace_copies_labels() {
        let mut e = EnumIdentifier::new("order_status");
        e.add_value("old");

        let mut labels = vec!["a".to_string(), "b".to_string()];
        e.set_values(&labels);

        // Mutating the caller's Vec must not affect the identifier.
        labels.push("c".to_string());
        labels[0] = "z".to_string();

        assert_eq!(e.values(), ["a", "b"]);
    }
}
