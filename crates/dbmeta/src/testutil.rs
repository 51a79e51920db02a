//! Scripted connection mock for reader tests.
//!
//! Queries are matched by SQL substring against scripted results; every
//! call is recorded (statement text, bound parameters, savepoint
//! operations, commits/rollbacks) so tests can assert both the produced
//! value model and the transaction discipline behind it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::connection::Connection;
use crate::core::value::{MetaValue, Row};
use crate::dialect::{DbSettings, DialectId};
use crate::error::{MetaError, Result};

/// One recorded `query` call.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<MetaValue>,
}

struct Script {
    needle: String,
    rows: Vec<Row>,
}

#[derive(Default)]
struct FailureInjection {
    query_containing: Option<String>,
    execute_containing: Option<String>,
    commit: bool,
    savepoint: bool,
}

/// A scripted in-memory [`Connection`].
pub struct MockConnection {
    dialect: String,
    settings: DbSettings,
    scripts: Mutex<Vec<Script>>,
    failures: FailureInjection,
    pub queries: Mutex<Vec<RecordedQuery>>,
    pub statements: Mutex<Vec<String>>,
    /// Currently active savepoints, in creation order.
    pub savepoints: Mutex<Vec<String>>,
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
}

impl MockConnection {
    /// A connection reporting the given dialect id, with that dialect's
    /// default settings.
    pub fn new(reported: &str) -> Self {
        Self {
            dialect: reported.to_string(),
            settings: DbSettings::for_dialect(DialectId::from_reported(reported)),
            scripts: Mutex::new(Vec::new()),
            failures: FailureInjection::default(),
            queries: Mutex::new(Vec::new()),
            statements: Mutex::new(Vec::new()),
            savepoints: Mutex::new(Vec::new()),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
        }
    }

    /// Override the settings record.
    pub fn with_settings(mut self, settings: DbSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Script a result: any query whose SQL contains `needle` returns
    /// `rows`. Scripts are matched in registration order.
    pub fn script(self, needle: &str, rows: Vec<Vec<MetaValue>>) -> Self {
        self.scripts.lock().unwrap().push(Script {
            needle: needle.to_string(),
            rows: rows.into_iter().map(Row::new).collect(),
        });
        self
    }

    /// Fail any query whose SQL contains `needle`.
    pub fn fail_query_containing(mut self, needle: &str) -> Self {
        self.failures.query_containing = Some(needle.to_string());
        self
    }

    /// Fail any executed statement whose SQL contains `needle`.
    pub fn fail_execute_containing(mut self, needle: &str) -> Self {
        self.failures.execute_containing = Some(needle.to_string());
        self
    }

    /// Fail the next commit.
    pub fn fail_commit(mut self) -> Self {
        self.failures.commit = true;
        self
    }

    /// Refuse to set savepoints.
    pub fn fail_savepoint(mut self) -> Self {
        self.failures.savepoint = true;
        self
    }

    /// All statements passed to `execute`, joined for assertions.
    pub fn executed(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    /// Parameters bound by the `idx`-th query call.
    pub fn bound_params(&self, idx: usize) -> Vec<MetaValue> {
        self.queries.lock().unwrap()[idx].params.clone()
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn dialect_id(&self) -> &str {
        &self.dialect
    }

    fn settings(&self) -> &DbSettings {
        &self.settings
    }

    async fn query(&self, sql: &str, params: &[MetaValue]) -> Result<Vec<Row>> {
        self.queries.lock().unwrap().push(RecordedQuery {
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        if let Some(needle) = &self.failures.query_containing {
            if sql.contains(needle.as_str()) {
                return Err(MetaError::execution("mock query", "injected failure"));
            }
        }

        let scripts = self.scripts.lock().unwrap();
        for script in scripts.iter() {
            if sql.contains(script.needle.as_str()) {
                return Ok(script.rows.clone());
            }
        }
        Ok(Vec::new())
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        self.statements.lock().unwrap().push(sql.to_string());
        if let Some(needle) = &self.failures.execute_containing {
            if sql.contains(needle.as_str()) {
                return Err(MetaError::execution("mock execute", "injected failure"));
            }
        }
        Ok(0)
    }

    async fn set_savepoint(&self, name: &str) -> Result<()> {
        if self.failures.savepoint {
            return Err(MetaError::Connection("savepoint refused".to_string()));
        }
        self.savepoints.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn release_savepoint(&self, name: &str) -> Result<()> {
        let mut sps = self.savepoints.lock().unwrap();
        match sps.iter().rposition(|s| s == name) {
            Some(pos) => {
                // Releasing a savepoint discards it and everything after it.
                sps.truncate(pos);
                Ok(())
            }
            None => Err(MetaError::Connection(format!(
                "no such savepoint: {}",
                name
            ))),
        }
    }

    async fn rollback_to_savepoint(&self, name: &str) -> Result<()> {
        let mut sps = self.savepoints.lock().unwrap();
        match sps.iter().rposition(|s| s == name) {
            Some(pos) => {
                // Rolling back keeps the savepoint itself defined.
                sps.truncate(pos + 1);
                Ok(())
            }
            None => Err(MetaError::Connection(format!(
                "no such savepoint: {}",
                name
            ))),
        }
    }

    async fn commit(&self) -> Result<()> {
        if self.failures.commit {
            return Err(MetaError::Connection("commit refused".to_string()));
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.savepoints.lock().unwrap().clear();
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.savepoints.lock().unwrap().clear();
        Ok(())
    }
}
