//! Stored routine introspection.

use async_trait::async_trait;

use crate::connection::Connection;
use crate::core::procedure::{
    ParameterDefinition, ParameterMode, ProcedureDefinition, RoutineType,
};
use crate::core::source::SourceState;
use crate::core::value::MetaValue;
use crate::dialect::DialectId;
use crate::error::{MetaError, Result};

/// Optional filters for routine listing. Absent fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ProcedureFilter {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    /// Name pattern, using the dialect's LIKE syntax.
    pub name: Option<String>,
}

/// Per-dialect source retrieval record. Dialects without one have no
/// documented way to obtain routine source.
#[derive(Debug, Clone)]
struct SourceQueryConfig {
    sql: &'static str,
    /// One logical source is split across rows and must be concatenated
    /// in cursor order.
    joins_rows: bool,
    /// Text prepended to the stored source to make it executable.
    prefix: Option<&'static str>,
}

fn source_config_for(dialect: Option<DialectId>) -> Option<SourceQueryConfig> {
    let dialect = dialect?;
    let cfg = match dialect {
        DialectId::Postgres | DialectId::Greenplum | DialectId::Redshift => SourceQueryConfig {
            sql: "SELECT pg_catalog.pg_get_functiondef(p.oid) \
                  FROM pg_catalog.pg_proc p \
                    JOIN pg_catalog.pg_namespace n ON n.oid = p.pronamespace \
                  WHERE p.proname = ? AND n.nspname = COALESCE(?, current_schema())",
            joins_rows: false,
            prefix: None,
        },
        DialectId::Oracle => SourceQueryConfig {
            // One row per source line; the ORDER BY makes the reassembly
            // order explicit.
            sql: "SELECT text FROM all_source \
                  WHERE name = ? \
                    AND owner = COALESCE(?, SYS_CONTEXT('USERENV', 'CURRENT_SCHEMA')) \
                    AND type IN ('PROCEDURE', 'FUNCTION') \
                  ORDER BY line",
            joins_rows: true,
            prefix: Some("CREATE OR REPLACE "),
        },
        DialectId::SqlServer => SourceQueryConfig {
            sql: "SELECT m.definition \
                  FROM sys.sql_modules m \
                    JOIN sys.objects o ON o.object_id = m.object_id \
                    JOIN sys.schemas s ON s.schema_id = o.schema_id \
                  WHERE o.type IN ('P', 'FN', 'IF', 'TF') AND o.name = ? \
                    AND s.name = COALESCE(?, SCHEMA_NAME())",
            joins_rows: false,
            prefix: None,
        },
        DialectId::Mysql | DialectId::MariaDb | DialectId::H2 | DialectId::Hsqldb => {
            SourceQueryConfig {
                sql: "SELECT routine_definition FROM information_schema.routines \
                      WHERE routine_name = ? AND (routine_schema = ? OR ? IS NULL)",
                joins_rows: false,
                prefix: None,
            }
        }
        DialectId::Db2Lu => SourceQueryConfig {
            sql: "SELECT text FROM syscat.routines \
                  WHERE routinename = ? AND routineschema = ?",
            joins_rows: false,
            prefix: None,
        },
        DialectId::Firebird => SourceQueryConfig {
            sql: "SELECT rdb$procedure_source FROM rdb$procedures \
                  WHERE rdb$procedure_name = ?",
            joins_rows: false,
            prefix: None,
        },
        _ => return None,
    };
    Some(cfg)
}

/// Lists routines and their parameters, and loads routine source on
/// demand.
#[async_trait]
pub trait ProcedureReader: Send + Sync {
    /// Routines matching the filter.
    async fn list_procedures(
        &self,
        conn: &dyn Connection,
        filter: &ProcedureFilter,
    ) -> Result<Vec<ProcedureDefinition>>;

    /// The ordered parameter list of one routine.
    async fn list_parameters(
        &self,
        conn: &dyn Connection,
        proc: &ProcedureDefinition,
    ) -> Result<Vec<ParameterDefinition>>;

    /// Load the routine's source text into `proc.source`.
    ///
    /// On dialects with no documented source retrieval this sets
    /// [`SourceState::Unavailable`] and fails with the distinguished
    /// "capability not configured" condition, which callers treat as a
    /// soft failure.
    async fn load_source(
        &self,
        conn: &dyn Connection,
        proc: &mut ProcedureDefinition,
    ) -> Result<()>;
}

/// Baseline reader over `information_schema.routines` / `.parameters`,
/// with the per-dialect source query table above.
pub struct GenericProcedureReader {
    dialect: Option<DialectId>,
}

impl GenericProcedureReader {
    pub fn new(dialect: Option<DialectId>) -> Self {
        Self { dialect }
    }

    fn dialect_name(&self) -> String {
        self.dialect
            .map_or_else(|| "unknown".to_string(), |d| d.wire_id().to_string())
    }
}

#[async_trait]
impl ProcedureReader for GenericProcedureReader {
    async fn list_procedures(
        &self,
        conn: &dyn Connection,
        filter: &ProcedureFilter,
    ) -> Result<Vec<ProcedureDefinition>> {
        let sql = "SELECT routine_catalog, routine_schema, routine_name, \
                     specific_name, routine_type \
                   FROM information_schema.routines \
                   WHERE (routine_catalog = ? OR ? IS NULL) \
                     AND (routine_schema = ? OR ? IS NULL) \
                     AND (routine_name LIKE ? OR ? IS NULL) \
                   ORDER BY routine_schema, routine_name, specific_name";
        let catalog = MetaValue::from(filter.catalog.as_deref());
        let schema = MetaValue::from(filter.schema.as_deref());
        let name = MetaValue::from(filter.name.as_deref());
        let params = [
            catalog.clone(),
            catalog,
            schema.clone(),
            schema,
            name.clone(),
            name,
        ];

        let rows = conn.query(sql, &params).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let name = row.opt_trimmed(2)?;
                let routine_type = match row.opt_str(4)?.trim().to_ascii_uppercase().as_str() {
                    "FUNCTION" => RoutineType::Function,
                    _ => RoutineType::Procedure,
                };
                let mut p = ProcedureDefinition::new(name, routine_type);
                p.catalog = row.opt_trimmed(0).filter(|s| !s.is_empty());
                p.schema = row.opt_trimmed(1).filter(|s| !s.is_empty());
                if let Some(specific) = row.opt_trimmed(3).filter(|s| !s.is_empty()) {
                    p.specific_name = specific;
                }
                Some(p)
            })
            .collect())
    }

    async fn list_parameters(
        &self,
        conn: &dyn Connection,
        proc: &ProcedureDefinition,
    ) -> Result<Vec<ParameterDefinition>> {
        let sql = "SELECT parameter_name, data_type, parameter_mode, ordinal_position \
                   FROM information_schema.parameters \
                   WHERE specific_name = ? AND (specific_schema = ? OR ? IS NULL) \
                   ORDER BY ordinal_position";
        let schema = MetaValue::from(proc.schema.as_deref());
        let params = [
            MetaValue::from(proc.specific_name.as_str()),
            schema.clone(),
            schema,
        ];

        let rows = conn.query(sql, &params).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let ordinal = row.get_i64_or_zero(3) as i32;
                let mode = match row.opt_str(2).map(str::to_ascii_uppercase).as_deref() {
                    Some("OUT") => ParameterMode::Out,
                    Some("INOUT") => ParameterMode::InOut,
                    Some("IN") => ParameterMode::In,
                    // The return value is modeled as position 0 with no mode.
                    _ if ordinal == 0 => ParameterMode::Return,
                    _ => ParameterMode::In,
                };
                ParameterDefinition {
                    name: row.opt_trimmed(0).filter(|n| !n.is_empty()),
                    dbms_type: row.opt_trimmed(1).unwrap_or_default(),
                    mode,
                    ordinal,
                }
            })
            .collect())
    }

    async fn load_source(
        &self,
        conn: &dyn Connection,
        proc: &mut ProcedureDefinition,
    ) -> Result<()> {
        let Some(cfg) = source_config_for(self.dialect) else {
            proc.source = SourceState::Unavailable;
            return Err(MetaError::not_configured(
                "procedure source",
                self.dialect_name(),
            ));
        };

        let schema = MetaValue::from(proc.schema.as_deref());
        let params = [
            MetaValue::from(proc.name.as_str()),
            schema.clone(),
            schema,
        ];
        // Firebird's query has a single placeholder; extra bind values
        // are dropped by the adapter, not the template.
        let bind_count = cfg.sql.matches('?').count().min(params.len());

        let rows = conn.query(cfg.sql, &params[..bind_count]).await?;
        if rows.is_empty() {
            return Err(MetaError::ObjectNotFound(proc.display_expression()));
        }

        let mut text = String::new();
        if let Some(prefix) = cfg.prefix {
            text.push_str(prefix);
        }
        if cfg.joins_rows {
            for row in &rows {
                if let Some(fragment) = row.opt_str(0) {
                    text.push_str(fragment);
                }
            }
        } else if let Some(body) = rows[0].opt_str(0) {
            text.push_str(body);
        }

        proc.source = SourceState::Loaded(text);
        Ok(())
    }
}
