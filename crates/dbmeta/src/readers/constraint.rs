//! Check constraint retrieval.
//!
//! One generic executor handles every dialect; the differences live in
//! [`ConstraintQueryConfig`] value records: the catalog SQL, where the
//! table/schema parameters bind, and how the stored text must be
//! decorated to read as a complete `CHECK (...)` clause. Some dialects
//! store the whole clause, some only the boolean expression, and a few
//! split one constraint across several catalog rows that have to be
//! joined back together in cursor order.

use tracing::debug;

use crate::connection::Connection;
use crate::core::constraint::ConstraintExpression;
use crate::core::identifier::TableIdentifier;
use crate::core::value::{MetaValue, Row};
use crate::dialect::DialectId;

/// Query configuration for one dialect's check constraint retrieval.
///
/// A value record, not a subclass: the generic executor in
/// [`ConstraintReader`] consumes it.
#[derive(Debug, Clone)]
pub struct ConstraintQueryConfig {
    /// Query returning (constraint_name, expression) rows for the
    /// table-level constraints of one table.
    pub table_sql: &'static str,

    /// Query returning (constraint_name, column_name, expression) rows
    /// for column-level constraints; absent when the dialect's catalog
    /// does not distinguish column scope.
    pub column_sql: Option<&'static str>,

    /// 1-based bind index of the table-name parameter.
    pub table_name_index: u8,

    /// 1-based bind index of the schema-name parameter, for dialects
    /// whose query needs one.
    pub schema_name_index: Option<u8>,

    /// Text prepended to the stored expression to reconstitute a full
    /// `CHECK (...)` clause. Dialects storing the complete clause need
    /// none.
    pub prefix: Option<&'static str>,

    /// Text appended after the stored expression.
    pub suffix: Option<&'static str>,

    /// One logical constraint spans several result rows whose text
    /// fragments must be concatenated in cursor order.
    pub joins_rows: bool,
}

impl ConstraintQueryConfig {
    /// A config with the defaults: table parameter at index 1, no schema
    /// parameter, no decoration, one row per constraint.
    fn standard(table_sql: &'static str) -> Self {
        Self {
            table_sql,
            column_sql: None,
            table_name_index: 1,
            schema_name_index: None,
            prefix: None,
            suffix: None,
            joins_rows: false,
        }
    }
}

/// The catalog query table. Dialects without an entry have no readable
/// check constraint metadata; the reader reports no constraints for them.
fn config_for(dialect: Option<DialectId>) -> Option<ConstraintQueryConfig> {
    let dialect = dialect?;
    let cfg = match dialect {
        DialectId::Postgres | DialectId::Greenplum | DialectId::Redshift => {
            // pg_get_constraintdef returns the complete clause.
            ConstraintQueryConfig {
                schema_name_index: Some(2),
                ..ConstraintQueryConfig::standard(
                    "SELECT c.conname, pg_catalog.pg_get_constraintdef(c.oid) \
                     FROM pg_catalog.pg_constraint c \
                       JOIN pg_catalog.pg_class t ON t.oid = c.conrelid \
                       JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace \
                     WHERE c.contype = 'c' AND t.relname = ? AND n.nspname = ? \
                     ORDER BY c.conname",
                )
            }
        }
        DialectId::Oracle => ConstraintQueryConfig {
            // search_condition holds only the boolean expression.
            // generated = 'USER NAME' skips the implicit NOT NULL rows.
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT constraint_name, search_condition \
                 FROM all_constraints \
                 WHERE constraint_type = 'C' AND generated = 'USER NAME' \
                   AND table_name = ? AND owner = ? \
                 ORDER BY constraint_name",
            )
        },
        DialectId::SqlServer => ConstraintQueryConfig {
            // definition is already parenthesized: ([amount]>(0)).
            schema_name_index: Some(2),
            prefix: Some("check "),
            column_sql: Some(
                "SELECT cc.name, col.name, cc.definition \
                 FROM sys.check_constraints cc \
                   JOIN sys.columns col ON col.object_id = cc.parent_object_id \
                     AND col.column_id = cc.parent_column_id \
                   JOIN sys.objects o ON o.object_id = cc.parent_object_id \
                   JOIN sys.schemas s ON s.schema_id = o.schema_id \
                 WHERE cc.parent_column_id > 0 AND o.name = ? AND s.name = ? \
                 ORDER BY cc.name",
            ),
            ..ConstraintQueryConfig::standard(
                "SELECT cc.name, cc.definition \
                 FROM sys.check_constraints cc \
                   JOIN sys.objects o ON o.object_id = cc.parent_object_id \
                   JOIN sys.schemas s ON s.schema_id = o.schema_id \
                 WHERE cc.parent_column_id = 0 AND o.name = ? AND s.name = ? \
                 ORDER BY cc.name",
            )
        },
        DialectId::Mysql | DialectId::MariaDb => ConstraintQueryConfig {
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT cc.constraint_name, cc.check_clause \
                 FROM information_schema.check_constraints cc \
                   JOIN information_schema.table_constraints tc \
                     ON tc.constraint_schema = cc.constraint_schema \
                     AND tc.constraint_name = cc.constraint_name \
                 WHERE tc.constraint_type = 'CHECK' \
                   AND tc.table_name = ? AND tc.table_schema = ? \
                 ORDER BY cc.constraint_name",
            )
        },
        DialectId::Firebird => ConstraintQueryConfig {
            // The trigger source holds the full CHECK clause; one
            // constraint is returned as one row per dependent column, so
            // the fragments are joined in cursor order. The ORDER BY
            // forces that order instead of assuming it.
            joins_rows: true,
            ..ConstraintQueryConfig::standard(
                "SELECT rc.rdb$constraint_name, trg.rdb$trigger_source \
                 FROM rdb$relation_constraints rc \
                   JOIN rdb$check_constraints chk \
                     ON rc.rdb$constraint_name = chk.rdb$constraint_name \
                   JOIN rdb$triggers trg ON chk.rdb$trigger_name = trg.rdb$trigger_name \
                 WHERE rc.rdb$constraint_type = 'CHECK' AND trg.rdb$trigger_type = 1 \
                   AND rc.rdb$relation_name = ? \
                 ORDER BY rc.rdb$constraint_name, chk.rdb$trigger_name",
            )
        },
        DialectId::Db2Lu => ConstraintQueryConfig {
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT constname, text FROM syscat.checks \
                 WHERE tabname = ? AND tabschema = ? \
                 ORDER BY constname",
            )
        },
        DialectId::Db2I => ConstraintQueryConfig {
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT constraint_name, check_clause FROM qsys2.syschkcst \
                 WHERE table_name = ? AND table_schema = ? \
                 ORDER BY constraint_name",
            )
        },
        DialectId::Db2Z => ConstraintQueryConfig {
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT checkname, checkcondition FROM sysibm.syschecks \
                 WHERE tbname = ? AND tbowner = ? \
                 ORDER BY checkname",
            )
        },
        DialectId::H2 => ConstraintQueryConfig {
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT constraint_name, check_expression \
                 FROM information_schema.constraints \
                 WHERE constraint_type = 'CHECK' \
                   AND table_name = ? AND table_schema = ? \
                 ORDER BY constraint_name",
            )
        },
        DialectId::Hsqldb => ConstraintQueryConfig {
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT tc.constraint_name, cc.check_clause \
                 FROM information_schema.table_constraints tc \
                   JOIN information_schema.check_constraints cc \
                     ON tc.constraint_name = cc.constraint_name \
                 WHERE tc.constraint_type = 'CHECK' \
                   AND tc.table_name = ? AND tc.table_schema = ? \
                 ORDER BY tc.constraint_name",
            )
        },
        DialectId::Derby => ConstraintQueryConfig {
            // checkdefinition is the parenthesized expression.
            schema_name_index: Some(2),
            prefix: Some("check "),
            ..ConstraintQueryConfig::standard(
                "SELECT c.constraintname, ck.checkdefinition \
                 FROM sys.sysconstraints c \
                   JOIN sys.syschecks ck ON c.constraintid = ck.constraintid \
                   JOIN sys.systables t ON t.tableid = c.tableid \
                   JOIN sys.sysschemas s ON s.schemaid = t.schemaid \
                 WHERE c.type = 'C' AND t.tablename = ? AND s.schemaname = ? \
                 ORDER BY c.constraintname",
            )
        },
        DialectId::Informix => ConstraintQueryConfig {
            // syschecks stores the text in fixed-width fragments keyed by
            // seqno; the ORDER BY makes the reassembly order explicit.
            joins_rows: true,
            prefix: Some("check "),
            ..ConstraintQueryConfig::standard(
                "SELECT c.constrname, ch.checktext \
                 FROM sysconstraints c \
                   JOIN systables t ON t.tabid = c.tabid \
                   JOIN syschecks ch ON ch.constrid = c.constrid \
                 WHERE c.constrtype = 'C' AND ch.type = 'T' AND t.tabname = ? \
                 ORDER BY c.constrname, ch.seqno",
            )
        },
        DialectId::SqlAnywhere => ConstraintQueryConfig {
            // check_defn holds the complete clause.
            column_sql: Some(
                "SELECT con.constraint_name, col.column_name, chk.check_defn \
                 FROM sys.sysconstraint con \
                   JOIN sys.syscheck chk ON chk.check_id = con.constraint_id \
                   JOIN sys.systabcol col ON col.object_id = con.ref_object_id \
                   JOIN sys.systab t ON t.object_id = col.table_object_id \
                 WHERE con.constraint_type = 'C' AND t.table_name = ? \
                 ORDER BY con.constraint_name",
            ),
            ..ConstraintQueryConfig::standard(
                "SELECT con.constraint_name, chk.check_defn \
                 FROM sys.sysconstraint con \
                   JOIN sys.syscheck chk ON chk.check_id = con.constraint_id \
                   JOIN sys.systab t ON t.object_id = con.table_object_id \
                 WHERE con.constraint_type = 'T' AND t.table_name = ? \
                 ORDER BY con.constraint_name",
            )
        },
        DialectId::SybaseAse => ConstraintQueryConfig {
            // syscomments splits the stored source into 255-byte rows
            // keyed by colid.
            joins_rows: true,
            ..ConstraintQueryConfig::standard(
                "SELECT o.name, c.text \
                 FROM sysobjects o \
                   JOIN syscomments c ON c.id = o.id \
                 WHERE o.type = 'R' AND o.id IN \
                   (SELECT constrid FROM sysconstraints WHERE tableid = object_id(?)) \
                 ORDER BY o.name, c.colid",
            )
        },
        DialectId::Vertica => ConstraintQueryConfig {
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT constraint_name, predicate \
                 FROM v_catalog.table_constraints \
                 WHERE constraint_type = 'c' \
                   AND table_name = ? AND table_schema = ? \
                 ORDER BY constraint_name",
            )
        },
        DialectId::MaxDb => ConstraintQueryConfig {
            schema_name_index: Some(2),
            prefix: Some("check ("),
            suffix: Some(")"),
            ..ConstraintQueryConfig::standard(
                "SELECT constraintname, definition FROM domain.constraints \
                 WHERE tablename = ? AND owner = ? \
                 ORDER BY constraintname",
            )
        },
        // No readable check constraint catalog (or the engine ignores
        // CHECK clauses altogether).
        DialectId::Sqlite
        | DialectId::Cubrid
        | DialectId::Exasol
        | DialectId::MonetDb => return None,
    };
    Some(cfg)
}

/// Generic check constraint reader, parameterized by the dialect's
/// [`ConstraintQueryConfig`].
pub struct ConstraintReader {
    dialect: Option<DialectId>,
    config: Option<ConstraintQueryConfig>,
}

impl ConstraintReader {
    /// Resolve the reader for a dialect. Always succeeds; dialects
    /// without a config simply report no constraints.
    pub fn for_dialect(dialect: Option<DialectId>) -> Self {
        Self {
            dialect,
            config: config_for(dialect),
        }
    }

    /// True if this dialect has any check constraint retrieval at all.
    pub fn supports_check_constraints(&self) -> bool {
        self.config.is_some()
    }

    /// True if this dialect can additionally retrieve column-level
    /// constraints.
    pub fn supports_column_constraints(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(|c| c.column_sql.is_some())
    }

    /// All table-level check constraints of `table`.
    ///
    /// Absence is routine: missing catalog views, restricted accounts and
    /// empty cursors all yield an empty list, never an error.
    pub async fn table_constraints(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<ConstraintExpression> {
        let Some(cfg) = &self.config else {
            return Vec::new();
        };

        let rows = match self.run(conn, cfg, cfg.table_sql, table).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(
                    table = %table.display_expression(),
                    error = %e,
                    "check constraint query failed, treating as no constraints"
                );
                return Vec::new();
            }
        };

        collect(cfg, rows, false)
    }

    /// All column-level check constraints of `table`, for dialects that
    /// support them; empty everywhere else.
    pub async fn column_constraints(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<ConstraintExpression> {
        let Some(cfg) = &self.config else {
            return Vec::new();
        };
        let Some(column_sql) = cfg.column_sql else {
            return Vec::new();
        };

        let rows = match self.run(conn, cfg, column_sql, table).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(
                    table = %table.display_expression(),
                    error = %e,
                    "column constraint query failed, treating as no constraints"
                );
                return Vec::new();
            }
        };

        collect(cfg, rows, true)
    }

    /// Bind the configured parameters in ascending index order and run
    /// the query.
    async fn run(
        &self,
        conn: &dyn Connection,
        cfg: &ConstraintQueryConfig,
        sql: &str,
        table: &TableIdentifier,
    ) -> crate::error::Result<Vec<Row>> {
        let mut max_index = cfg.table_name_index;
        if let Some(s) = cfg.schema_name_index {
            max_index = max_index.max(s);
        }

        let mut params = vec![MetaValue::Null; max_index as usize];
        params[(cfg.table_name_index - 1) as usize] = MetaValue::from(table.name.as_str());
        if let Some(schema_index) = cfg.schema_name_index {
            params[(schema_index - 1) as usize] = MetaValue::from(table.schema.as_deref());
        }

        debug!(
            dialect = ?self.dialect,
            table = %table.display_expression(),
            "reading check constraints"
        );
        conn.query(sql, &params).await
    }
}

/// Turn the raw cursor into constraint expressions: join multi-row
/// fragments when configured, then decorate with prefix/suffix.
fn collect(cfg: &ConstraintQueryConfig, rows: Vec<Row>, column_scoped: bool) -> Vec<ConstraintExpression> {
    // (name, column, fragments) per logical constraint, in cursor order.
    let mut grouped: Vec<(Option<String>, Option<String>, String)> = Vec::new();

    for row in rows {
        let name = row.opt_trimmed(0).filter(|n| !n.is_empty());
        let (column, text_idx) = if column_scoped {
            (row.opt_trimmed(1), 2)
        } else {
            (None, 1)
        };
        let Some(fragment) = row.opt_str(text_idx) else {
            continue;
        };

        match grouped.last_mut() {
            Some((last_name, _, text)) if cfg.joins_rows && *last_name == name => {
                // Continuation row of the same constraint: append the
                // fragment in cursor order.
                text.push_str(fragment);
            }
            _ => grouped.push((name, column, fragment.to_string())),
        }
    }

    grouped
        .into_iter()
        .map(|(name, column, text)| {
            let expression = decorate(cfg, text.trim());
            match column {
                Some(col) => ConstraintExpression::column_level(name, col, expression),
                None => ConstraintExpression::table_level(name, expression),
            }
        })
        .collect()
}

fn decorate(cfg: &ConstraintQueryConfig, raw: &str) -> String {
    let mut out = String::with_capacity(
        raw.len() + cfg.prefix.map_or(0, str::len) + cfg.suffix.map_or(0, str::len),
    );
    if let Some(p) = cfg.prefix {
        out.push_str(p);
    }
    out.push_str(raw);
    if let Some(s) = cfg.suffix {
        out.push_str(s);
    }
    out
}
