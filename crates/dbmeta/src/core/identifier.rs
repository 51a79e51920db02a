//! Identifiers for database objects, plus validation and quoting.
//!
//! SQL identifiers (table names, column names, schema names) cannot be
//! bound as statement parameters; only data values can. Whenever this
//! layer embeds an identifier in generated SQL (drop statements,
//! reconstructed view sources) it first validates the name for suspicious
//! patterns and then applies the dialect's quoting convention, doubling
//! embedded quote characters.

use serde::{Deserialize, Serialize};

use crate::dialect::{DialectId, QuoteStyle};
use crate::error::{MetaError, Result};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL: 63 bytes
/// - SQL Server: 128 characters
/// - MySQL: 64 characters
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier before it is embedded in generated SQL.
///
/// Rejects empty identifiers, identifiers containing null bytes, and
/// identifiers exceeding the maximum length.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MetaError::InvalidIdentifier(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(MetaError::InvalidIdentifier(format!(
            "identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MetaError::InvalidIdentifier(format!(
            "identifier exceeds maximum length of {} bytes (got {}): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote an identifier using the given dialect's convention.
///
/// The embedded closing character is doubled. Unknown dialects quote the
/// ANSI way (double quotes).
pub fn quote_ident(dialect: Option<DialectId>, name: &str) -> Result<String> {
    validate_identifier(name)?;
    let style = dialect.map_or(QuoteStyle::DoubleQuote, |d| d.quote_style());
    Ok(match style {
        QuoteStyle::DoubleQuote => format!("\"{}\"", name.replace('"', "\"\"")),
        QuoteStyle::Bracket => format!("[{}]", name.replace(']', "]]")),
        QuoteStyle::Backtick => format!("`{}`", name.replace('`', "``")),
    })
}

/// The object type tag carried by a [`TableIdentifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Table,
    View,
    MaterializedView,
    Synonym,
    Sequence,
    SystemTable,
    TemporaryTable,
}

impl ObjectType {
    /// The keyword used in DDL for this object type.
    pub fn keyword(&self) -> &'static str {
        match self {
            ObjectType::Table | ObjectType::SystemTable => "TABLE",
            ObjectType::View => "VIEW",
            ObjectType::MaterializedView => "MATERIALIZED VIEW",
            ObjectType::Synonym => "SYNONYM",
            ObjectType::Sequence => "SEQUENCE",
            ObjectType::TemporaryTable => "TEMPORARY TABLE",
        }
    }
}

/// Identifies a table-like object in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIdentifier {
    /// Catalog (database) qualifier, where the dialect has one.
    pub catalog: Option<String>,

    /// Schema (owner) qualifier, where the dialect has one.
    pub schema: Option<String>,

    /// Object name as stored in the catalog.
    pub name: String,

    /// What kind of object this identifier denotes.
    pub object_type: ObjectType,

    /// Free-text remark from the catalog, if any.
    pub comment: Option<String>,
}

impl TableIdentifier {
    /// A plain table identifier with no qualifiers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
            object_type: ObjectType::Table,
            comment: None,
        }
    }

    /// A schema-qualified table identifier.
    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..Self::new(name)
        }
    }

    /// Builder-style catalog qualifier.
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Builder-style object type tag.
    pub fn of_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = object_type;
        self
    }

    /// Render the identifier for display, including only the non-empty
    /// qualifiers: `catalog.schema.name`, `schema.name`, or `name`.
    pub fn display_expression(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(c) = self.catalog.as_deref().filter(|c| !c.is_empty()) {
            parts.push(c);
        }
        if let Some(s) = self.schema.as_deref().filter(|s| !s.is_empty()) {
            parts.push(s);
        }
        parts.push(&self.name);
        parts.join(".")
    }

    /// Render the identifier quoted and qualified for embedding in DDL.
    pub fn qualified_expression(&self, dialect: Option<DialectId>) -> Result<String> {
        let mut parts = Vec::with_capacity(3);
        if let Some(c) = self.catalog.as_deref().filter(|c| !c.is_empty()) {
            parts.push(quote_ident(dialect, c)?);
        }
        if let Some(s) = self.schema.as_deref().filter(|s| !s.is_empty()) {
            parts.push(quote_ident(dialect, s)?);
        }
        parts.push(quote_ident(dialect, &self.name)?);
        Ok(parts.join("."))
    }

    /// Lookup identity: (catalog, schema, name), compared with the
    /// dialect's case rule.
    pub fn same_object(&self, other: &TableIdentifier, case_sensitive: bool) -> bool {
        fn eq(a: Option<&str>, b: Option<&str>, cs: bool) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => {
                    if cs {
                        a == b
                    } else {
                        a.eq_ignore_ascii_case(b)
                    }
                }
                _ => false,
            }
        }
        eq(
            self.catalog.as_deref(),
            other.catalog.as_deref(),
            case_sensitive,
        ) && eq(
            self.schema.as_deref(),
            other.schema.as_deref(),
            case_sensitive,
        ) && eq(Some(&self.name), Some(&other.name), case_sensitive)
    }
}

impl std::fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_expression())
    }
}

/// The resolved type of a column as the driver reported it, after any
/// dialect correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeDescriptor {
    /// Standard driver type code (see [`crate::types::codes`]).
    pub type_code: i32,

    /// Native DBMS type name (`varchar2`, `nvarchar`, `int8`, ...).
    pub dbms_type: String,

    /// Declared size / maximum length, where applicable.
    pub size: i64,

    /// Decimal digits (scale), where applicable.
    pub digits: i32,
}

/// A column of a table, as discovered in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnIdentifier {
    /// Name of the owning table (by value; the column does not own the
    /// table definition).
    pub table_name: String,

    /// Declared column name.
    pub name: String,

    /// Resolved type descriptor.
    pub data_type: DataTypeDescriptor,

    /// Whether the column accepts NULL.
    pub is_nullable: bool,

    /// Whether the column is part of the table's primary key.
    pub is_pk: bool,

    /// Free-text remark from the catalog, if any.
    pub comment: Option<String>,

    /// 1-based ordinal position within the table.
    pub ordinal: i32,
}
