//! Capability resolution.
//!
//! [`DbMetadata`] is the per-connection metadata context: it inspects the
//! connection's reported dialect id once, resolves every capability to a
//! concrete strategy, and caches those strategies for the lifetime of the
//! context. Resolution is a pure function of the dialect id and the
//! settings flags, performs no I/O, and never fails: unrecognized ids get the
//! baseline strategy for every capability. The context is owned by
//! whoever owns the connection and is torn down with it; strategies are
//! stateless and may be shared freely across queries on that connection.

use std::sync::Arc;

use crate::connection::Connection;
use crate::ddl::DropExecutor;
use crate::dialect::{DbSettings, DialectId};
use crate::probe::TransactionProbe;
use crate::readers::constraint::ConstraintReader;
use crate::readers::enums::{EnumReader, GenericEnumReader, MysqlEnumReader, PostgresEnumReader};
use crate::readers::fk::{ForeignKeyHandler, GenericFkHandler, SqlServerFkHandler};
use crate::readers::procedure::{GenericProcedureReader, ProcedureReader};
use crate::readers::table::{GenericTableReader, TableDefinitionReader};
use crate::readers::trigger::{
    GenericTriggerReader, OracleTriggerReader, PostgresTriggerReader, TriggerReader,
};
use crate::readers::view::{
    GenericViewReader, OracleViewReader, PostgresViewReader, SqlServerViewReader, ViewReader,
};
use crate::types::{
    DataTypeResolver, DefaultTypeResolver, MysqlTypeResolver, OracleTypeResolver,
    SqlServerTypeResolver,
};

/// Per-connection metadata context with cached capability strategies.
pub struct DbMetadata {
    dialect: Option<DialectId>,
    settings: DbSettings,
    constraint_reader: Arc<ConstraintReader>,
    view_reader: Arc<dyn ViewReader>,
    trigger_reader: Arc<dyn TriggerReader>,
    fk_handler: Arc<dyn ForeignKeyHandler>,
    procedure_reader: Arc<dyn ProcedureReader>,
    table_reader: Arc<dyn TableDefinitionReader>,
    enum_reader: Arc<dyn EnumReader>,
    type_resolver: Arc<dyn DataTypeResolver>,
    transaction_probe: Arc<TransactionProbe>,
    drop_executor: Arc<DropExecutor>,
}

impl DbMetadata {
    /// Resolve every capability for the connection's reported dialect,
    /// using the connection's settings flags.
    pub fn for_connection(conn: &dyn Connection) -> Self {
        Self::new(conn.dialect_id(), conn.settings().clone())
    }

    /// Resolve every capability from a reported dialect id and explicit
    /// settings.
    pub fn new(reported_id: &str, settings: DbSettings) -> Self {
        let dialect = DialectId::from_reported(reported_id);

        let view_reader: Arc<dyn ViewReader> = match dialect {
            Some(d) if d.is_postgres_family() => Arc::new(PostgresViewReader),
            Some(DialectId::Oracle) => Arc::new(OracleViewReader),
            Some(DialectId::SqlServer) => Arc::new(SqlServerViewReader),
            other => Arc::new(GenericViewReader::new(other)),
        };

        let trigger_reader: Arc<dyn TriggerReader> = match dialect {
            Some(d) if d.is_postgres_family() => Arc::new(PostgresTriggerReader),
            Some(DialectId::Oracle) => Arc::new(OracleTriggerReader),
            _ => Arc::new(GenericTriggerReader),
        };

        let fk_handler: Arc<dyn ForeignKeyHandler> = match dialect {
            Some(DialectId::SqlServer) if settings.fk_uses_corrective_path => {
                Arc::new(SqlServerFkHandler)
            }
            _ => Arc::new(GenericFkHandler),
        };

        let enum_reader: Arc<dyn EnumReader> = match dialect {
            Some(d) if d.is_postgres_family() => Arc::new(PostgresEnumReader),
            Some(DialectId::Mysql | DialectId::MariaDb) => Arc::new(MysqlEnumReader),
            _ => Arc::new(GenericEnumReader),
        };

        let type_resolver: Arc<dyn DataTypeResolver> = match dialect {
            Some(DialectId::Oracle) => Arc::new(OracleTypeResolver),
            Some(DialectId::Mysql | DialectId::MariaDb) => Arc::new(MysqlTypeResolver),
            Some(DialectId::SqlServer) => Arc::new(SqlServerTypeResolver),
            _ => Arc::new(DefaultTypeResolver),
        };

        Self {
            constraint_reader: Arc::new(ConstraintReader::for_dialect(dialect)),
            view_reader,
            trigger_reader,
            fk_handler,
            procedure_reader: Arc::new(GenericProcedureReader::new(dialect)),
            table_reader: Arc::new(GenericTableReader),
            enum_reader,
            type_resolver,
            transaction_probe: Arc::new(TransactionProbe::for_dialect(dialect)),
            drop_executor: Arc::new(DropExecutor::for_dialect(dialect)),
            dialect,
            settings,
        }
    }

    /// The resolved canonical dialect, if the reported id was recognized.
    pub fn dialect(&self) -> Option<DialectId> {
        self.dialect
    }

    /// The settings flags this context was resolved with.
    pub fn settings(&self) -> &DbSettings {
        &self.settings
    }

    pub fn constraint_reader(&self) -> &ConstraintReader {
        &self.constraint_reader
    }

    pub fn view_reader(&self) -> &dyn ViewReader {
        self.view_reader.as_ref()
    }

    pub fn trigger_reader(&self) -> &dyn TriggerReader {
        self.trigger_reader.as_ref()
    }

    pub fn foreign_key_handler(&self) -> &dyn ForeignKeyHandler {
        self.fk_handler.as_ref()
    }

    pub fn procedure_reader(&self) -> &dyn ProcedureReader {
        self.procedure_reader.as_ref()
    }

    pub fn table_reader(&self) -> &dyn TableDefinitionReader {
        self.table_reader.as_ref()
    }

    pub fn enum_reader(&self) -> &dyn EnumReader {
        self.enum_reader.as_ref()
    }

    pub fn type_resolver(&self) -> &dyn DataTypeResolver {
        self.type_resolver.as_ref()
    }

    /// Shared handle to the type resolver, for callers that feed it into
    /// the table reader.
    pub fn type_resolver_arc(&self) -> Arc<dyn DataTypeResolver> {
        self.type_resolver.clone()
    }

    pub fn transaction_probe(&self) -> &TransactionProbe {
        &self.transaction_probe
    }

    pub fn drop_executor(&self) -> &DropExecutor {
        &self.drop_executor
    }
}

impl std::fmt::Debug for DbMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbMetadata")
            .field("dialect", &self.dialect)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockConnection;
    use crate::types::codes;

    #[test]
    fn test_resolution_never_fails_for_any_dialect() {
        for d in DialectId::ALL {
            let meta = DbMetadata::new(d.wire_id(), DbSettings::for_dialect(Some(*d)));
            assert_eq!(meta.dialect(), Some(*d));
            // Every capability accessor yields a usable strategy.
            let _ = meta.constraint_reader();
            let _ = meta.view_reader();
            let _ = meta.trigger_reader();
            let _ = meta.foreign_key_handler();
            let _ = meta.procedure_reader();
            let _ = meta.table_reader();
            let _ = meta.enum_reader();
            let _ = meta.type_resolver();
            let _ = meta.transaction_probe();
            let _ = meta.drop_executor();
        }
    }

    #[test]
    fn test_unknown_dialect_gets_baseline_strategies() {
        let meta = DbMetadata::new("frobnitzdb", DbSettings::default());
        assert_eq!(meta.dialect(), None);
        assert!(!meta.constraint_reader().supports_check_constraints());
        assert!(!meta.transaction_probe().is_supported());
        // Baseline resolver is a pure pass-through.
        assert_eq!(
            meta.type_resolver().fix_column_type(codes::OTHER, "blorb"),
            codes::OTHER
        );
        assert_eq!(
            meta.type_resolver().column_class_override(codes::OTHER, "blorb"),
            None
        );
    }

    #[test]
    fn test_corrective_fk_path_honors_settings_flag() {
        let with_flag = DbMetadata::new(
            "microsoft_sql_server",
            DbSettings::for_dialect(Some(DialectId::SqlServer)),
        );
        // Defaults for SQL Server enable the corrective path; switching
        // the flag off falls back to the standard handler. Both resolve.
        let mut settings = DbSettings::for_dialect(Some(DialectId::SqlServer));
        settings.fk_uses_corrective_path = false;
        let without_flag = DbMetadata::new("microsoft_sql_server", settings);

        let _ = with_flag.foreign_key_handler();
        let _ = without_flag.foreign_key_handler();
    }

    #[test]
    fn test_for_connection_uses_reported_id() {
        let conn = MockConnection::new("PostgreSQL");
        let meta = DbMetadata::for_connection(&conn);
        assert_eq!(meta.dialect(), Some(DialectId::Postgres));
        assert!(meta.settings().probe_needs_savepoint);
    }

    #[test]
    fn test_strategies_are_cached_per_context() {
        let meta = DbMetadata::new("oracle", DbSettings::for_dialect(Some(DialectId::Oracle)));
        let a = meta.type_resolver_arc();
        let b = meta.type_resolver_arc();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
