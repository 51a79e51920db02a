//! Trigger retrieval.

use async_trait::async_trait;
use tracing::debug;

use crate::connection::Connection;
use crate::core::identifier::TableIdentifier;
use crate::core::source::SourceState;
use crate::core::trigger::{TriggerDefinition, TriggerTiming};
use crate::core::value::MetaValue;
use crate::dialect::DialectId;
use crate::error::{MetaError, Result};

/// Retrieves triggers defined on a table.
#[async_trait]
pub trait TriggerReader: Send + Sync {
    /// All triggers attached to `table`.
    ///
    /// Listing failures from restricted catalogs are routine and yield an
    /// empty list.
    async fn list_triggers(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<TriggerDefinition>;

    /// Load the body of one trigger.
    async fn trigger_source(
        &self,
        conn: &dyn Connection,
        trigger_name: &str,
        schema: Option<&str>,
    ) -> Result<String>;
}

/// Baseline reader over `information_schema.triggers`.
///
/// The standard view returns one row per (trigger, event); rows for the
/// same trigger are merged and their events collected in cursor order.
pub struct GenericTriggerReader;

#[async_trait]
impl TriggerReader for GenericTriggerReader {
    async fn list_triggers(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<TriggerDefinition> {
        let sql = "SELECT trigger_name, action_timing, event_manipulation \
                   FROM information_schema.triggers \
                   WHERE event_object_table = ? \
                     AND (trigger_schema = ? OR ? IS NULL) \
                   ORDER BY trigger_name";
        let schema = MetaValue::from(table.schema.as_deref());
        let params = [
            MetaValue::from(table.name.as_str()),
            schema.clone(),
            schema,
        ];

        let rows = match conn.query(sql, &params).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(
                    table = %table.display_expression(),
                    error = %e,
                    "trigger listing failed, treating as no triggers"
                );
                return Vec::new();
            }
        };

        let mut triggers: Vec<TriggerDefinition> = Vec::new();
        for row in rows {
            let Some(name) = row.opt_trimmed(0).filter(|n| !n.is_empty()) else {
                continue;
            };
            let timing = row.opt_str(1).and_then(TriggerTiming::from_catalog);
            let event = row.opt_trimmed(2);

            match triggers.last_mut() {
                Some(last) if last.name == name => {
                    if let Some(event) = event {
                        last.events.push(event);
                    }
                }
                _ => {
                    let mut t = TriggerDefinition::new(name, table.name.clone());
                    t.timing = timing;
                    if let Some(event) = event {
                        t.events.push(event);
                    }
                    triggers.push(t);
                }
            }
        }
        triggers
    }

    async fn trigger_source(
        &self,
        conn: &dyn Connection,
        trigger_name: &str,
        schema: Option<&str>,
    ) -> Result<String> {
        let sql = "SELECT action_statement FROM information_schema.triggers \
                   WHERE trigger_name = ? AND (trigger_schema = ? OR ? IS NULL)";
        let schema = MetaValue::from(schema);
        let params = [MetaValue::from(trigger_name), schema.clone(), schema];

        let rows = conn.query(sql, &params).await?;
        match rows.first().and_then(|r| r.opt_str(0)) {
            Some(text) => Ok(text.to_string()),
            None => Err(MetaError::ObjectNotFound(trigger_name.to_string())),
        }
    }
}

/// PostgreSQL: internal constraint triggers are filtered out and the
/// server reconstructs the full definition.
pub struct PostgresTriggerReader;

#[async_trait]
impl TriggerReader for PostgresTriggerReader {
    async fn list_triggers(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<TriggerDefinition> {
        let sql = "SELECT t.tgname, pg_catalog.pg_get_triggerdef(t.oid, true) \
                   FROM pg_catalog.pg_trigger t \
                     JOIN pg_catalog.pg_class c ON c.oid = t.tgrelid \
                     JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                   WHERE NOT t.tgisinternal AND c.relname = ? \
                     AND n.nspname = COALESCE(?, current_schema()) \
                   ORDER BY t.tgname";
        let params = [
            MetaValue::from(table.name.as_str()),
            MetaValue::from(table.schema.as_deref()),
        ];

        let rows = match conn.query(sql, &params).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(
                    table = %table.display_expression(),
                    error = %e,
                    "trigger listing failed, treating as no triggers"
                );
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| {
                let name = row.opt_trimmed(0)?;
                let mut t = TriggerDefinition::new(name, table.name.clone());
                if let Some(def) = row.opt_str(1) {
                    t.source = SourceState::Loaded(def.to_string());
                }
                Some(t)
            })
            .collect()
    }

    async fn trigger_source(
        &self,
        conn: &dyn Connection,
        trigger_name: &str,
        schema: Option<&str>,
    ) -> Result<String> {
        let sql = "SELECT pg_catalog.pg_get_triggerdef(t.oid, true) \
                   FROM pg_catalog.pg_trigger t \
                     JOIN pg_catalog.pg_class c ON c.oid = t.tgrelid \
                     JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                   WHERE t.tgname = ? AND n.nspname = COALESCE(?, current_schema())";
        let params = [MetaValue::from(trigger_name), MetaValue::from(schema)];

        let rows = conn.query(sql, &params).await?;
        match rows.first().and_then(|r| r.opt_str(0)) {
            Some(text) => Ok(text.to_string()),
            None => Err(MetaError::ObjectNotFound(trigger_name.to_string())),
        }
    }
}

/// Oracle keeps the body separate from the description in `ALL_TRIGGERS`.
pub struct OracleTriggerReader;

#[async_trait]
impl TriggerReader for OracleTriggerReader {
    async fn list_triggers(
        &self,
        conn: &dyn Connection,
        table: &TableIdentifier,
    ) -> Vec<TriggerDefinition> {
        let sql = "SELECT trigger_name, trigger_type, triggering_event \
                   FROM all_triggers \
                   WHERE table_name = ? \
                     AND owner = COALESCE(?, SYS_CONTEXT('USERENV', 'CURRENT_SCHEMA')) \
                   ORDER BY trigger_name";
        let params = [
            MetaValue::from(table.name.as_str()),
            MetaValue::from(table.schema.as_deref()),
        ];

        let rows = match conn.query(sql, &params).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(
                    table = %table.display_expression(),
                    error = %e,
                    "trigger listing failed, treating as no triggers"
                );
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| {
                let name = row.opt_trimmed(0)?;
                let mut t = TriggerDefinition::new(name, table.name.clone());
                // trigger_type is e.g. "BEFORE EACH ROW".
                t.timing = row
                    .opt_str(1)
                    .and_then(|ty| ty.split_whitespace().next())
                    .and_then(TriggerTiming::from_catalog);
                if let Some(events) = row.opt_str(2) {
                    t.events = events
                        .split(" OR ")
                        .map(|e| e.trim().to_string())
                        .filter(|e| !e.is_empty())
                        .collect();
                }
                Some(t)
            })
            .collect()
    }

    async fn trigger_source(
        &self,
        conn: &dyn Connection,
        trigger_name: &str,
        schema: Option<&str>,
    ) -> Result<String> {
        let sql = "SELECT trigger_body FROM all_triggers \
                   WHERE trigger_name = ? \
                     AND owner = COALESCE(?, SYS_CONTEXT('USERENV', 'CURRENT_SCHEMA'))";
        let params = [MetaValue::from(trigger_name), MetaValue::from(schema)];

        let rows = conn.query(sql, &params).await?;
        match rows.first().and_then(|r| r.opt_str(0)) {
            Some(text) => Ok(text.to_string()),
            None => Err(MetaError::ObjectNotFound(trigger_name.to_string())),
        }
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
    async fn test_multi_event_rows_merge_into_one_trigger() {
        let conn = MockConnection::new("h2").script(
            "information_schema.triggers",
            vec![
                vec![text("trg_audit"), text("AFTER"), text("INSERT")],
                vec![text("trg_audit"), text("AFTER"), text("UPDATE")],
                vec![text("trg_clean"), text("BEFORE"), text("DELETE")],
            ],
        );
        let reader = GenericTriggerReader;
        let table = TableIdentifier::with_schema("public", "orders");

        let triggers = reader.list_triggers(&conn, &table).await;
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[0].name, "trg_audit");
        assert_eq!(triggers[0].events, ["INSERT", "UPDATE"]);
        assert_eq!(triggers[0].timing, Some(TriggerTiming::After));
        assert_eq!(triggers[1].events, ["DELETE"]);
    }

    #[tokio::test]
    async fn test_listing_failure_is_empty_not_error() {
        let conn = MockConnection::new("h2").fail_query_containing("triggers");
        let reader = GenericTriggerReader;
        let table = TableIdentifier::new("orders");

        assert!(reader.list_triggers(&conn, &table).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_trigger_source_is_object_not_found() {
        let conn = MockConnection::new("h2");
        let reader = GenericTriggerReader;

        let err = reader
            .trigger_source(&conn, "trg_gone", None)
            .await
            .unwrap_err();
        assert!(err.is_object_not_found());
    }

    #[tokio::test]
    async fn test_oracle_splits_compound_events() {
        let conn = MockConnection::new("oracle").script(
            "all_triggers",
            vec![vec![
                text("TRG_ORDERS"),
                text("BEFORE EACH ROW"),
                text("INSERT OR UPDATE"),
            ]],
        );
        let reader = OracleTriggerReader;
        let table = TableIdentifier::with_schema("SCOTT", "ORDERS");

        let triggers = reader.list_triggers(&conn, &table).await;
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].timing, Some(TriggerTiming::Before));
        assert_eq!(triggers[0].events, ["INSERT", "UPDATE"]);
    }

    #[tokio::test]
    async fn test_postgres_listing_carries_loaded_source() {
        let conn = MockConnection::new("postgresql").script(
            "pg_get_triggerdef",
            vec![vec![
                text("trg_audit"),
                text("CREATE TRIGGER trg_audit AFTER INSERT ON orders ..."),
            ]],
        );
        let reader = PostgresTriggerReader;
        let table = TableIdentifier::with_schema("public", "orders");

        let triggers = reader.list_triggers(&conn, &table).await;
        assert_eq!(triggers.len(), 1);
        assert!(matches!(triggers[0].source, SourceState::Loaded(_)));
    }
}
