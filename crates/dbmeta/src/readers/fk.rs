//! Foreign key retrieval.

use async_trait::async_trait;
use tracing::debug;

use crate::connection::Connection;
use crate::core::fk::{FkDefinition, FkRule};
use crate::core::identifier::TableIdentifier;
use crate::core::value::{MetaValue, Row};

/// Retrieves the foreign keys of a table.
#[async_trait]
pub trait ForeignKeyHandler: Send + Sync {
    /// All foreign keys declared on `table`, column pairs in key order.
    ///
    /// Restricted catalogs yield an empty list.
    async fn list_foreign_keys(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<FkDefinition>;
}

/// Shared row-folding for the (constraint, column, ref_table, ref_column,
/// update_rule, delete_rule) cursor shape. Rows for one constraint arrive
/// consecutively, ordered by key position.
fn fold_fk_rows(rows: Vec<Row>) -> Vec<FkDefinition> {
    let mut fks: Vec<FkDefinition> = Vec::new();
    for row in rows {
        let Some(name) = row.opt_trimmed(0).filter(|n| !n.is_empty()) else {
            continue;
        };
        let column = row.opt_trimmed(1).unwrap_or_default();
        let ref_table = row.opt_trimmed(2).unwrap_or_default();
        let ref_column = row.opt_trimmed(3).unwrap_or_default();

        match fks.last_mut() {
            Some(last) if last.constraint_name == name => {
                last.add_column_pair(column, ref_column);
            }
            _ => {
                let mut fk = FkDefinition::new(name, ref_table);
                fk.update_rule = row.opt_str(4).map(FkRule::from_catalog).unwrap_or_default();
                fk.delete_rule = row.opt_str(5).map(FkRule::from_catalog).unwrap_or_default();
                fk.add_column_pair(column, ref_column);
                fks.push(fk);
            }
        }
    }
    fks
}

/// Baseline handler over the standard `information_schema` pair.
pub struct GenericFkHandler;

#[async_trait]
impl ForeignKeyHandler for GenericFkHandler {
    async fn list_foreign_keys(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<FkDefinition> {
        let sql = "SELECT rc.constraint_name, kcu.column_name, \
                     ccu.table_name, ccu.column_name, \
                     rc.update_rule, rc.delete_rule \
                   FROM information_schema.referential_constraints rc \
                     JOIN information_schema.key_column_usage kcu \
                       ON kcu.constraint_schema = rc.constraint_schema \
                       AND kcu.constraint_name = rc.constraint_name \
                     JOIN information_schema.constraint_column_usage ccu \
                       ON ccu.constraint_schema = rc.unique_constraint_schema \
                       AND ccu.constraint_name = rc.unique_constraint_name \
                   WHERE kcu.table_name = ? \
                     AND (kcu.table_schema = ? OR ? IS NULL) \
                   ORDER BY rc.constraint_name, kcu.ordinal_position";
        let schema = MetaValue::from(table.schema.as_deref());
        let params = [
            MetaValue::from(table.name.as_str()),
            schema.clone(),
            schema,
        ];

        match conn.query(sql, &params).await {
            Ok(rows) => fold_fk_rows(rows),
            Err(e) => {
                debug!(
                    table = %table.display_expression(),
                    error = %e,
                    "foreign key query failed, treating as no foreign keys"
                );
                Vec::new()
            }
        }
    }
}

/// Corrective handler for SQL Server, selected via the
/// `fk_uses_corrective_path` settings flag: the driver's own metadata
/// calls misreport multi-column keys, so the catalog is read directly.
pub struct SqlServerFkHandler;

#[async_trait]
impl ForeignKeyHandler for SqlServerFkHandler {
    async fn list_foreign_keys(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<FkDefinition> {
        let sql = "SELECT fk.name, pc.name, rt.name, rc.name, \
                     fk.update_referential_action_desc, \
                     fk.delete_referential_action_desc \
                   FROM sys.foreign_keys fk \
                     JOIN sys.foreign_key_columns fkc \
                       ON fkc.constraint_object_id = fk.object_id \
                     JOIN sys.tables pt ON pt.object_id = fk.parent_object_id \
                     JOIN sys.schemas ps ON ps.schema_id = pt.schema_id \
                     JOIN sys.columns pc ON pc.object_id = fkc.parent_object_id \
                       AND pc.column_id = fkc.parent_column_id \
                     JOIN sys.tables rt ON rt.object_id = fk.referenced_object_id \
                     JOIN sys.columns rc ON rc.object_id = fkc.referenced_object_id \
                       AND rc.column_id = fkc.referenced_column_id \
                   WHERE pt.name = ? AND ps.name = COALESCE(?, SCHEMA_NAME()) \
                   ORDER BY fk.name, fkc.constraint_column_id";
        let params = [
            MetaValue::from(table.name.as_str()),
            MetaValue::from(table.schema.as_deref()),
        ];

        match conn.query(sql, &params).await {
            Ok(rows) => {
                // The action descriptions use underscores: SET_NULL.
                let mut fks = fold_fk_rows(
                    rows.into_iter()
                        .map(|r| {
                            Row::new(
                                (0..6)
                                    .map(|i| match (i, r.opt_str(i)) {
                                        (4 | 5, Some(s)) => {
                                            MetaValue::from(s.replace('_', " "))
                                        }
                                        (_, Some(s)) => MetaValue::from(s),
                                        (_, None) => MetaValue::Null,
                                    })
                                    .collect(),
                            )
                        })
                        .collect(),
                );
                for fk in &mut fks {
                    debug!(fk = %fk.constraint_name, "corrective foreign key path used");
                }
                fks
            }
            Err(e) => {
                debug!(
                    table = %table.display_expression(),
                    error = %e,
                    "foreign key query failed, treating as no foreign keys"
                );
                Vec::new()
            }
        }
    }
}
