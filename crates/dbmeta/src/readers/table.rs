//! Table column introspection.

use async_trait::async_trait;
use tracing::debug;

use crate::connection::Connection;
use crate::core::identifier::{ColumnIdentifier, DataTypeDescriptor, TableIdentifier};
use crate::core::value::MetaValue;
use crate::error::{MetaError, Result};
use crate::types::{codes, DataTypeResolver};

/// Map a catalog type name to the standard driver code, for connections
/// whose adapter does not surface the code itself.
fn code_for_type_name(name: &str) -> i32 {
    let base = name
        .trim()
        .split(['(', ' '])
        .next()
        .unwrap_or(name)
        .to_ascii_lowercase();
    match base.as_str() {
        "char" | "bpchar" | "character" => codes::CHAR,
        "varchar" | "varchar2" | "character varying" => codes::VARCHAR,
        "nchar" => codes::NCHAR,
        "nvarchar" | "nvarchar2" => codes::NVARCHAR,
        "text" | "clob" | "long" => codes::LONGVARCHAR,
        "smallint" | "int2" => codes::SMALLINT,
        "int" | "integer" | "int4" | "mediumint" => codes::INTEGER,
        "bigint" | "int8" => codes::BIGINT,
        "tinyint" => codes::TINYINT,
        "numeric" => codes::NUMERIC,
        "decimal" | "number" | "dec" => codes::DECIMAL,
        "real" | "float4" | "binary_float" => codes::REAL,
        "double" | "float8" | "binary_double" | "double precision" => codes::DOUBLE,
        "float" => codes::FLOAT,
        "boolean" | "bool" => codes::BOOLEAN,
        "bit" => codes::BIT,
        "date" => codes::DATE,
        "time" => codes::TIME,
        "timestamp" | "datetime" | "datetime2" | "smalldatetime" => codes::TIMESTAMP,
        "timestamptz" | "timestamp with time zone" | "datetimeoffset" => {
            codes::TIMESTAMP_WITH_TIMEZONE
        }
        "binary" => codes::BINARY,
        "varbinary" | "raw" | "bytea" => codes::VARBINARY,
        "blob" | "image" | "long raw" => codes::BLOB,
        "xml" | "xmltype" => codes::SQLXML,
        _ => codes::OTHER,
    }
}

/// Reads the column definitions of one table.
#[async_trait]
pub trait TableDefinitionReader: Send + Sync {
    /// The ordered columns of `table`, with pk membership marked from the
    /// already-known key column names and type metadata passed through
    /// the given resolver.
    ///
    /// `None` table short-circuits to `None`. A table absent from the
    /// catalog at query time fails with the distinguished "object not
    /// found" condition.
    async fn read_columns(
        &self,
        conn: &dyn Connection,
        table: Option<&TableIdentifier>,
        pk_columns: &[String],
        resolver: &dyn DataTypeResolver,
    ) -> Result<Option<Vec<ColumnIdentifier>>>;
}

/// Baseline reader over `information_schema.columns`.
pub struct GenericTableReader;

#[async_trait]
impl TableDefinitionReader for GenericTableReader {
    async fn read_columns(
        &self,
        conn: &dyn Connection,
        table: Option<&TableIdentifier>,
        pk_columns: &[String],
        resolver: &dyn DataTypeResolver,
    ) -> Result<Option<Vec<ColumnIdentifier>>> {
        let Some(table) = table else {
            return Ok(None);
        };

        let sql = "SELECT column_name, data_type, \
                     COALESCE(character_maximum_length, numeric_precision, 0), \
                     COALESCE(numeric_scale, 0), is_nullable, ordinal_position \
                   FROM information_schema.columns \
                   WHERE table_name = ? AND (table_schema = ? OR ? IS NULL) \
                   ORDER BY ordinal_position";
        let schema = MetaValue::from(table.schema.as_deref());
        let params = [
            MetaValue::from(table.name.as_str()),
            schema.clone(),
            schema.clone(),
        ];

        let rows = conn.query(sql, &params).await?;

        if rows.is_empty() {
            // Zero columns can also mean a privilege-restricted catalog;
            // only report "not found" when the table really is absent.
            let exists_sql = "SELECT COUNT(*) FROM information_schema.tables \
                              WHERE table_name = ? AND (table_schema = ? OR ? IS NULL)";
            let exists = conn
                .query(exists_sql, &params)
                .await?
                .first()
                .map(|r| r.get_i64_or_zero(0) > 0)
                .unwrap_or(false);
            if !exists {
                return Err(MetaError::ObjectNotFound(table.display_expression()));
            }
            debug!(
                table = %table.display_expression(),
                "table exists but no columns are visible"
            );
            return Ok(Some(Vec::new()));
        }

        let columns = rows
            .into_iter()
            .filter_map(|row| {
                let name = row.opt_trimmed(0)?;
                let dbms_type = row.opt_trimmed(1).unwrap_or_default();
                let reported = code_for_type_name(&dbms_type);
                let type_code = resolver.fix_column_type(reported, &dbms_type);
                Some(ColumnIdentifier {
                    table_name: table.name.clone(),
                    is_pk: pk_columns.iter().any(|pk| pk.eq_ignore_ascii_case(&name)),
                    name,
                    data_type: DataTypeDescriptor {
                        type_code,
                        size: row.get_i64_or_zero(2),
                        digits: row.get_i64_or_zero(3) as i32,
                        dbms_type,
                    },
                    is_nullable: row.get_bool_or_false(4),
                    comment: None,
                    ordinal: row.get_i64_or_zero(5) as i32,
                })
            })
            .collect();

        Ok(Some(columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockConnection;
    use crate::types::{DefaultTypeResolver, MysqlTypeResolver};

    fn text(s: &str) -> MetaValue {
        MetaValue::from(s)
    }

    #[tokio::test]
    async fn test_absent_identifier_short_circuits() {
        let conn = MockConnection::new("h2");
        let reader = GenericTableReader;

        let cols = reader
            .read_columns(&conn, None, &[], &DefaultTypeResolver)
            .await
            .unwrap();
        assert!(cols.is_none());
        assert!(conn.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_is_object_not_found() {
        let conn = MockConnection::new("h2").script(
            "information_schema.tables",
            vec![vec![MetaValue::Int(0)]],
        );
        let reader = GenericTableReader;
        let table = TableIdentifier::with_schema("public", "gone");

        let err = reader
            .read_columns(&conn, Some(&table), &[], &DefaultTypeResolver)
            .await
            .unwrap_err();
        assert!(err.is_object_not_found());
    }

    #[tokio::test]
    async fn test_invisible_columns_on_existing_table_are_empty_not_missing() {
        let conn = MockConnection::new("h2").script(
            "information_schema.tables",
            vec![vec![MetaValue::Int(1)]],
        );
        let reader = GenericTableReader;
        let table = TableIdentifier::with_schema("public", "restricted");

        let cols = reader
            .read_columns(&conn, Some(&table), &[], &DefaultTypeResolver)
            .await
            .unwrap();
        assert_eq!(cols, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_columns_ordered_with_pk_marked_and_types_resolved() {
        let conn = MockConnection::new("mysql").script(
            "information_schema.columns",
            vec![
                vec![
                    text("id"),
                    text("bigint"),
                    19.into(),
                    0.into(),
                    text("NO"),
                    1.into(),
                ],
                vec![
                    text("active"),
                    text("tinyint(1)"),
                    1.into(),
                    0.into(),
                    text("YES"),
                    2.into(),
                ],
            ],
        );
        let reader = GenericTableReader;
        let table = TableIdentifier::with_schema("shop", "customers");

        let cols = reader
            .read_columns(&conn, Some(&table), &["id".to_string()], &MysqlTypeResolver)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cols.len(), 2);
        assert!(cols[0].is_pk);
        assert!(!cols[0].is_nullable);
        assert_eq!(cols[0].data_type.type_code, codes::BIGINT);
        assert_eq!(cols[0].ordinal, 1);
        // TINYINT misreport repaired by the MySQL resolver.
        assert!(!cols[1].is_pk);
        assert!(cols[1].is_nullable);
        assert_eq!(cols[1].data_type.type_code, codes::BOOLEAN);
    }

    #[test]
    fn test_type_name_mapping() {
        assert_eq!(code_for_type_name("varchar(20)"), codes::VARCHAR);
        assert_eq!(code_for_type_name("character varying"), codes::VARCHAR);
        assert_eq!(code_for_type_name("NUMBER"), codes::DECIMAL);
        assert_eq!(code_for_type_name("timestamp with time zone"), codes::TIMESTAMP_WITH_TIMEZONE);
        assert_eq!(code_for_type_name("geometry"), codes::OTHER);
    }
}
