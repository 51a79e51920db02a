//! Advisory uncommitted-change detection.
//!
//! The probe backs a UI warning ("you have pending changes, commit
//! before disconnecting?"), so it must never raise and must never alter
//! the connection's transaction state. Dialects whose engines poison the
//! open transaction on any failed statement get a savepoint around the
//! counting query; the savepoint is released on success and rolled back
//! to (then released) on failure, on every exit path.

use tracing::debug;

use crate::connection::Connection;
use crate::dialect::DialectId;

/// Savepoint name used to guard the probe query.
const PROBE_SAVEPOINT: &str = "dbmeta_probe";

/// Per-dialect probe configuration.
#[derive(Debug, Clone)]
struct ProbeConfig {
    /// Query returning one row whose first cell is positive when the
    /// session has uncommitted changes.
    count_sql: &'static str,
    /// Wrap the query in a savepoint.
    use_savepoint: bool,
}

fn config_for(dialect: Option<DialectId>) -> Option<ProbeConfig> {
    let dialect = dialect?;
    let cfg = match dialect {
        DialectId::Oracle => ProbeConfig {
            count_sql: "SELECT COUNT(*) FROM v$transaction t \
                        JOIN v$session s ON t.ses_addr = s.saddr \
                        WHERE s.audsid = USERENV('SESSIONID')",
            use_savepoint: false,
        },
        DialectId::Postgres | DialectId::Greenplum | DialectId::Redshift => ProbeConfig {
            // A failed statement would abort the open transaction, so
            // the query runs inside a savepoint.
            count_sql: "SELECT COUNT(*) FROM pg_locks \
                        WHERE pid = pg_backend_pid() AND locktype = 'transactionid'",
            use_savepoint: true,
        },
        DialectId::Hsqldb => ProbeConfig {
            count_sql: "SELECT transaction_size FROM information_schema.system_sessions \
                        WHERE session_id = SESSION_ID()",
            use_savepoint: false,
        },
        DialectId::H2 => ProbeConfig {
            count_sql: "SELECT CASE WHEN contains_uncommitted THEN 1 ELSE 0 END \
                        FROM information_schema.sessions \
                        WHERE session_id = SESSION_ID()",
            use_savepoint: false,
        },
        _ => return None,
    };
    Some(cfg)
}

/// Detects whether the current session has uncommitted changes.
pub struct TransactionProbe {
    config: Option<ProbeConfig>,
}

impl TransactionProbe {
    /// Resolve the probe for a dialect. Dialects without a documented
    /// way to ask answer `false` without touching the connection.
    pub fn for_dialect(dialect: Option<DialectId>) -> Self {
        Self {
            config: config_for(dialect),
        }
    }

    /// True if the probe will actually query the session state.
    pub fn is_supported(&self) -> bool {
        self.config.is_some()
    }

    /// Advisory check for pending changes. Always returns a value; any
    /// failure along the way reads as "no uncommitted changes".
    pub async fn has_uncommitted_changes(&self, conn: &dyn Connection) -> bool {
        let Some(cfg) = &self.config else {
            return false;
        };

        let guarded = cfg.use_savepoint || conn.settings().probe_needs_savepoint;
        if guarded && conn.set_savepoint(PROBE_SAVEPOINT).await.is_err() {
            // Without the guard the probe is not safe to attempt.
            return false;
        }

        match conn.query(cfg.count_sql, &[]).await {
            Ok(rows) => {
                let pending = rows
                    .first()
                    .map(|r| r.get_i64_or_zero(0) > 0)
                    .unwrap_or(false);
                if guarded {
                    let _ = conn.release_savepoint(PROBE_SAVEPOINT).await;
                }
                pending
            }
            Err(e) => {
                debug!(error = %e, "transaction probe failed, assuming no pending changes");
                if guarded {
                    let _ = conn.rollback_to_savepoint(PROBE_SAVEPOINT).await;
                    let _ = conn.release_savepoint(PROBE_SAVEPOINT).await;
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::MetaValue;
    use crate::testutil::MockConnection;

    #[tokio::test]
    async fn test_positive_count_reports_pending_changes() {
        let conn =
            MockConnection::new("oracle").script("v$transaction", vec![vec![MetaValue::Int(1)]]);
        let probe = TransactionProbe::for_dialect(Some(DialectId::Oracle));

        assert!(probe.has_uncommitted_changes(&conn).await);
        // Oracle needs no savepoint guard.
        assert!(conn.savepoints.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_count_reports_clean() {
        let conn =
            MockConnection::new("oracle").script("v$transaction", vec![vec![MetaValue::Int(0)]]);
        let probe = TransactionProbe::for_dialect(Some(DialectId::Oracle));

        assert!(!probe.has_uncommitted_changes(&conn).await);
    }

    #[tokio::test]
    async fn test_savepoint_released_on_success() {
        let conn =
            MockConnection::new("postgresql").script("pg_locks", vec![vec![MetaValue::Int(2)]]);
        let probe = TransactionProbe::for_dialect(Some(DialectId::Postgres));

        assert!(probe.has_uncommitted_changes(&conn).await);
        assert!(conn.savepoints.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_never_raises_and_restores_savepoints() {
        let conn = MockConnection::new("postgresql").fail_query_containing("pg_locks");
        let probe = TransactionProbe::for_dialect(Some(DialectId::Postgres));

        assert!(!probe.has_uncommitted_changes(&conn).await);
        // The savepoint taken for the probe is gone again.
        assert!(conn.savepoints.lock().unwrap().is_empty());
        // The transaction itself was never rolled back or committed.
        assert_eq!(conn.commits.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(conn.rollbacks.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_savepoint_refusal_skips_the_probe() {
        let conn = MockConnection::new("postgresql").fail_savepoint();
        let probe = TransactionProbe::for_dialect(Some(DialectId::Postgres));

        assert!(!probe.has_uncommitted_changes(&conn).await);
        // The counting query was never attempted without its guard.
        assert!(conn.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_dialect_answers_false_without_queries() {
        let conn = MockConnection::new("sqlite");
        let probe = TransactionProbe::for_dialect(Some(DialectId::Sqlite));

        assert!(!probe.is_supported());
        assert!(!probe.has_uncommitted_changes(&conn).await);
        assert!(conn.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_h2_boolean_session_flag() {
        let conn = MockConnection::new("h2").script(
            "information_schema.sessions",
            vec![vec![MetaValue::Int(1)]],
        );
        let probe = TransactionProbe::for_dialect(Some(DialectId::H2));
        assert!(probe.has_uncommitted_changes(&conn).await);
    }
}
