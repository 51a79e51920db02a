//! View source retrieval.
//!
//! The baseline reads `information_schema.views`; dialect overrides use
//! the native catalog where that is the only reliable source (PostgreSQL
//! reconstructs the definition from the parse tree, Oracle stores it in
//! `ALL_VIEWS`, SQL Server keeps the complete CREATE statement in
//! `sys.sql_modules`).

use async_trait::async_trait;

use crate::connection::Connection;
use crate::core::value::MetaValue;
use crate::core::view::ViewDefinition;
use crate::dialect::DialectId;
use crate::error::{MetaError, Result};

/// How [`ViewReader::extended_view_source`] assembles the statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewSourceOptions {
    /// Precede the CREATE with a `DROP VIEW` guard.
    pub include_drop: bool,
    /// The statement will run standalone: terminate with a COMMIT.
    pub include_commit: bool,
}

impl ViewSourceOptions {
    /// Options for a statement embedded in a larger script.
    pub fn embedded(include_drop: bool) -> Self {
        Self {
            include_drop,
            include_commit: false,
        }
    }

    /// Options for a statement executed on its own.
    pub fn standalone(include_drop: bool) -> Self {
        Self {
            include_drop,
            include_commit: true,
        }
    }
}

/// Retrieves view definitions.
#[async_trait]
pub trait ViewReader: Send + Sync {
    /// The dialect this reader was resolved for.
    fn dialect(&self) -> Option<DialectId>;

    /// The raw stored definition of `view`, exactly as persisted
    /// (typically just the underlying SELECT).
    async fn view_source(&self, conn: &dyn Connection, view: &ViewDefinition) -> Result<String>;

    /// Load the stored definition into `view.source`.
    async fn load_source(&self, conn: &dyn Connection, view: &mut ViewDefinition) -> Result<()> {
        let text = self.view_source(conn, view).await?;
        view.source = crate::core::source::SourceState::Loaded(text);
        Ok(())
    }

    /// Reconstruct a complete, executable `CREATE VIEW` statement.
    async fn extended_view_source(
        &self,
        conn: &dyn Connection,
        view: &ViewDefinition,
        opts: ViewSourceOptions,
    ) -> Result<String> {
        let source = self.view_source(conn, view).await?;
        let name = view.identifier.qualified_expression(self.dialect())?;

        let mut sql = String::new();
        if opts.include_drop {
            sql.push_str(&format!("DROP VIEW {};\n\n", name));
        }
        sql.push_str(&format!("CREATE VIEW {}\nAS\n", name));
        let body = source.trim_end();
        sql.push_str(body);
        if !body.ends_with(';') {
            sql.push(';');
        }
        if opts.include_commit {
            sql.push_str("\n\nCOMMIT;");
        }
        Ok(sql)
    }
}

/// Baseline reader over `information_schema.views`.
pub struct GenericViewReader {
    dialect: Option<DialectId>,
}

impl GenericViewReader {
    pub fn new(dialect: Option<DialectId>) -> Self {
        Self { dialect }
    }
}

#[async_trait]
impl ViewReader for GenericViewReader {
    fn dialect(&self) -> Option<DialectId> {
        self.dialect
    }

    async fn view_source(&self, conn: &dyn Connection, view: &ViewDefinition) -> Result<String> {
        let sql = "SELECT view_definition FROM information_schema.views \
                   WHERE table_name = ? AND (table_schema = ? OR ? IS NULL)";
        let schema = MetaValue::from(view.identifier.schema.as_deref());
        let params = [
            MetaValue::from(view.identifier.name.as_str()),
            schema.clone(),
            schema,
        ];

        let rows = conn.query(sql, &params).await?;
        first_source(rows, view)
    }
}

/// PostgreSQL: the stored definition is reconstructed by the server.
pub struct PostgresViewReader;

#[async_trait]
impl ViewReader for PostgresViewReader {
    fn dialect(&self) -> Option<DialectId> {
        Some(DialectId::Postgres)
    }

    async fn view_source(&self, conn: &dyn Connection, view: &ViewDefinition) -> Result<String> {
        let sql = "SELECT pg_catalog.pg_get_viewdef(c.oid, true) \
                   FROM pg_catalog.pg_class c \
                     JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                   WHERE c.relkind IN ('v', 'm') AND c.relname = ? \
                     AND n.nspname = COALESCE(?, current_schema())";
        let params = [
            MetaValue::from(view.identifier.name.as_str()),
            MetaValue::from(view.identifier.schema.as_deref()),
        ];

        let rows = conn.query(sql, &params).await?;
        first_source(rows, view)
    }
}

/// Oracle stores the defining query verbatim in `ALL_VIEWS`.
pub struct OracleViewReader;

#[async_trait]
impl ViewReader for OracleViewReader {
    fn dialect(&self) -> Option<DialectId> {
        Some(DialectId::Oracle)
    }

    async fn view_source(&self, conn: &dyn Connection, view: &ViewDefinition) -> Result<String> {
        let sql = "SELECT text FROM all_views \
                   WHERE view_name = ? AND owner = COALESCE(?, SYS_CONTEXT('USERENV', 'CURRENT_SCHEMA'))";
        let params = [
            MetaValue::from(view.identifier.name.as_str()),
            MetaValue::from(view.identifier.schema.as_deref()),
        ];

        let rows = conn.query(sql, &params).await?;
        first_source(rows, view)
    }
}

/// SQL Server keeps the complete CREATE VIEW statement in
/// `sys.sql_modules`, so the extended source must not wrap it again.
pub struct SqlServerViewReader;

#[async_trait]
impl ViewReader for SqlServerViewReader {
    fn dialect(&self) -> Option<DialectId> {
        Some(DialectId::SqlServer)
    }

    async fn view_source(&self, conn: &dyn Connection, view: &ViewDefinition) -> Result<String> {
        let sql = "SELECT m.definition \
                   FROM sys.sql_modules m \
                     JOIN sys.objects o ON o.object_id = m.object_id \
                     JOIN sys.schemas s ON s.schema_id = o.schema_id \
                   WHERE o.type = 'V' AND o.name = ? \
                     AND s.name = COALESCE(?, SCHEMA_NAME())";
        let params = [
            MetaValue::from(view.identifier.name.as_str()),
            MetaValue::from(view.identifier.schema.as_deref()),
        ];

        let rows = conn.query(sql, &params).await?;
        first_source(rows, view)
    }

    async fn extended_view_source(
        &self,
        conn: &dyn Connection,
        view: &ViewDefinition,
        opts: ViewSourceOptions,
    ) -> Result<String> {
        // The stored text already is the full CREATE statement.
        let source = self.view_source(conn, view).await?;
        let name = view.identifier.qualified_expression(self.dialect())?;

        let mut sql = String::new();
        if opts.include_drop {
            sql.push_str(&format!("DROP VIEW {};\n\n", name));
        }
        let body = source.trim_end();
        sql.push_str(body);
        if !body.ends_with(';') {
            sql.push(';');
        }
        if opts.include_commit {
            sql.push_str("\n\nCOMMIT;");
        }
        Ok(sql)
    }
}

fn first_source(rows: Vec<crate::core::value::Row>, view: &ViewDefinition) -> Result<String> {
    let Some(row) = rows.first() else {
        return Err(MetaError::ObjectNotFound(view.display_expression()));
    };
    match row.opt_str(0) {
        Some(text) => Ok(text.to_string()),
        None => Err(MetaError::execution(
            "reading view source",
            format!(
                "catalog returned no definition text for {}",
                view.display_expression()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identifier::TableIdentifier;
    use crate::testutil::MockConnection;

    fn view(schema: &str, name: &str) -> ViewDefinition {
        ViewDefinition::new(TableIdentifier::with_schema(schema, name))
    }

    #[tokio::test]
    async fn test_raw_source_is_returned_verbatim() {
        let conn = MockConnection::new("h2").script(
            "information_schema.views",
            vec![vec![MetaValue::from("SELECT id, name FROM customers")]],
        );
        let reader = GenericViewReader::new(Some(DialectId::H2));

        let source = reader.view_source(&conn, &view("public", "v_active")).await.unwrap();
        assert_eq!(source, "SELECT id, name FROM customers");
    }

    #[tokio::test]
    async fn test_load_source_fills_the_state() {
        let conn = MockConnection::new("h2").script(
            "information_schema.views",
            vec![vec![MetaValue::from("SELECT 1")]],
        );
        let reader = GenericViewReader::new(Some(DialectId::H2));

        let mut v = view("public", "v_one");
        reader.load_source(&conn, &mut v).await.unwrap();
        assert_eq!(v.source.text(), Some("SELECT 1"));
    }

    #[tokio::test]
    async fn test_missing_view_is_object_not_found() {
        let conn = MockConnection::new("h2");
        let reader = GenericViewReader::new(Some(DialectId::H2));

        let err = reader
            .view_source(&conn, &view("public", "v_gone"))
            .await
            .unwrap_err();
        assert!(err.is_object_not_found());
    }

    #[tokio::test]
    async fn test_extended_source_wraps_create() {
        let conn = MockConnection::new("postgresql").script(
            "pg_get_viewdef",
            vec![vec![MetaValue::from("SELECT id FROM t")]],
        );
        let reader = PostgresViewReader;

        let sql = reader
            .extended_view_source(&conn, &view("public", "v1"), ViewSourceOptions::embedded(false))
            .await
            .unwrap();
        assert_eq!(sql, "CREATE VIEW \"public\".\"v1\"\nAS\nSELECT id FROM t;");
    }

    #[tokio::test]
    async fn test_extended_source_with_drop_and_commit() {
        let conn = MockConnection::new("postgresql").script(
            "pg_get_viewdef",
            vec![vec![MetaValue::from("SELECT 1;")]],
        );
        let reader = PostgresViewReader;

        let sql = reader
            .extended_view_source(&conn, &view("public", "v1"), ViewSourceOptions::standalone(true))
            .await
            .unwrap();
        assert!(sql.starts_with("DROP VIEW \"public\".\"v1\";\n\n"));
        assert!(sql.contains("CREATE VIEW \"public\".\"v1\""));
        assert!(sql.ends_with("\n\nCOMMIT;"));
    }

    #[tokio::test]
    async fn test_sqlserver_does_not_rewrap_stored_create() {
        let conn = MockConnection::new("microsoft_sql_server").script(
            "sys.sql_modules",
            vec![vec![MetaValue::from(
                "CREATE VIEW [dbo].[v1] AS SELECT 1 AS one",
            )]],
        );
        let reader = SqlServerViewReader;

        let sql = reader
            .extended_view_source(&conn, &view("dbo", "v1"), ViewSourceOptions::embedded(false))
            .await
            .unwrap();
        assert_eq!(sql, "CREATE VIEW [dbo].[v1] AS SELECT 1 AS one;");
        assert!(!sql.contains("AS\nCREATE"));
    }
}
