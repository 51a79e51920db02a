//! Enumerated type discovery.
//!
//! Only a couple of engines have enumerated types at all: PostgreSQL as
//! first-class types, MySQL as inline column types. Everywhere else the
//! baseline reports none; absence is the expected case, never an error.

use async_trait::async_trait;
use tracing::debug;

use crate::connection::Connection;
use crate::core::enums::EnumIdentifier;
use crate::core::value::MetaValue;

/// Discovers enumerated types.
#[async_trait]
pub trait EnumReader: Send + Sync {
    /// All enumerated types visible in `schema` (or everywhere when
    /// `None`), labels in defined order.
    async fn list_enums(&self, conn: &dyn Connection, schema: Option<&str>)
        -> Vec<EnumIdentifier>;
}

/// Baseline: the dialect has no enumerated types.
pub struct GenericEnumReader;

#[async_trait]
impl EnumReader for GenericEnumReader {
    async fn list_enums(
        &self,
        _conn: &dyn Connection,
        _schema: Option<&str>,
    ) -> Vec<EnumIdentifier> {
        Vec::new()
    }
}

/// PostgreSQL: first-class enum types, one catalog row per label in sort
/// order.
pub struct PostgresEnumReader;

#[async_trait]
impl EnumReader for PostgresEnumReader {
    async fn list_enums(
        &self,
        conn: &dyn Connection,
        schema: Option<&str>,
    ) -> Vec<EnumIdentifier> {
        let sql = "SELECT n.nspname, t.typname, e.enumlabel, \
                     obj_description(t.oid, 'pg_type') \
                   FROM pg_catalog.pg_type t \
                     JOIN pg_catalog.pg_enum e ON e.enumtypid = t.oid \
                     JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace \
                   WHERE t.typtype = 'e' AND (n.nspname = ? OR ? IS NULL) \
                   ORDER BY n.nspname, t.typname, e.enumsortorder";
        let schema = MetaValue::from(schema);
        let params = [schema.clone(), schema];

        let rows = match conn.query(sql, &params).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(error = %e, "enum type query failed, treating as none");
                return Vec::new();
            }
        };

        let mut enums: Vec<EnumIdentifier> = Vec::new();
        for row in rows {
            let Some(name) = row.opt_trimmed(1) else {
                continue;
            };
            let schema = row.opt_trimmed(0);
            let label = row.opt_trimmed(2);

            let same_type = enums
                .last()
                .is_some_and(|e| e.name == name && e.schema == schema);
            if !same_type {
                let mut e = EnumIdentifier::new(name);
                e.schema = schema;
                e.comment = row.opt_trimmed(3);
                enums.push(e);
            }
            if let (Some(e), Some(label)) = (enums.last_mut(), label) {
                e.add_value(label);
            }
        }
        enums
    }
}

/// MySQL: enums are inline column types; the labels are parsed out of
/// the `enum('a','b')` spelling in the columns catalog.
pub struct MysqlEnumReader;

/// Parse the labels out of `enum('a','b','it''s')`.
fn parse_enum_labels(column_type: &str) -> Vec<String> {
    let inner = column_type
        .trim()
        .strip_prefix("enum(")
        .or_else(|| column_type.trim().strip_prefix("ENUM("))
        .and_then(|rest| rest.strip_suffix(')'));
    let Some(inner) = inner else {
        return Vec::new();
    };

    let mut labels = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' if in_quote => {
                // Doubled quote is an escaped quote inside the label.
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    current.push('\'');
                } else {
                    in_quote = false;
                    labels.push(std::mem::take(&mut current));
                }
            }
            '\'' => in_quote = true,
            _ if in_quote => current.push(c),
            _ => {}
        }
    }
    labels
}

#[async_trait]
impl EnumReader for MysqlEnumReader {
    async fn list_enums(
        &self,
        conn: &dyn Connection,
        schema: Option<&str>,
    ) -> Vec<EnumIdentifier> {
        let sql = "SELECT table_schema, table_name, column_name, column_type \
                   FROM information_schema.columns \
                   WHERE data_type = 'enum' AND (table_schema = ? OR ? IS NULL) \
                   ORDER BY table_schema, table_name, ordinal_position";
        let schema = MetaValue::from(schema);
        let params = [schema.clone(), schema];

        let rows = match conn.query(sql, &params).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(error = %e, "enum column query failed, treating as none");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| {
                let table = row.opt_trimmed(1)?;
                let column = row.opt_trimmed(2)?;
                let labels = parse_enum_labels(row.opt_str(3)?);
                // The inline type has no name of its own; it is identified
                // by the column that declares it.
                let mut e = EnumIdentifier::new(format!("{}.{}", table, column));
                e.schema = row.opt_trimmed(0);
                e.set_values(&labels);
                Some(e)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockConnection;

    fn text(s: &str) -> MetaValue {
        MetaValue::from(s)
    }

    #[tokio::test]
    async fn test_baseline_reports_none_without_querying() {
        let conn = MockConnection::new("apache_derby");
        let found = GenericEnumReader.list_enums(&conn, None).await;
        assert!(found.is_empty());
        assert!(conn.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_postgres_rows_fold_into_types_in_label_order() {
        let conn = MockConnection::new("postgresql").script(
            "pg_enum",
            vec![
                vec![text("public"), text("mood"), text("sad"), MetaValue::Null],
                vec![text("public"), text("mood"), text("happy"), MetaValue::Null],
                vec![
                    text("public"),
                    text("status"),
                    text("open"),
                    text("ticket state"),
                ],
            ],
        );
        let found = PostgresEnumReader.list_enums(&conn, Some("public")).await;
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "mood");
        assert_eq!(found[0].values(), ["sad", "happy"]);
        assert_eq!(found[1].name, "status");
        assert_eq!(found[1].comment.as_deref(), Some("ticket state"));
    }

    #[tokio::test]
    async fn test_postgres_failure_is_empty() {
        let conn = MockConnection::new("postgresql").fail_query_containing("pg_enum");
        assert!(PostgresEnumReader.list_enums(&conn, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_mysql_parses_inline_enum_columns() {
        let conn = MockConnection::new("mysql").script(
            "data_type = 'enum'",
            vec![vec![
                text("shop"),
                text("orders"),
                text("status"),
                text("enum('new','shipped','it''s done')"),
            ]],
        );
        let found = MysqlEnumReader.list_enums(&conn, Some("shop")).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "orders.status");
        assert_eq!(found[0].values(), ["new", "shipped", "it's done"]);
    }

    #[test]
    fn test_parse_enum_labels_edge_cases() {
        assert_eq!(parse_enum_labels("enum('a')"), ["a"]);
        assert_eq!(parse_enum_labels("ENUM('a','b')"), ["a", "b"]);
        assert!(parse_enum_labels("varchar(10)").is_empty());
        assert_eq!(parse_enum_labels("enum('a,b','c')"), ["a,b", "c"]);
    }
}
