//! The connection boundary.
//!
//! This layer owns no connectivity. The caller hands in anything that
//! implements [`Connection`], a thin adapter over whatever driver the
//! application already uses, and every capability issues its catalog
//! queries through it.
//!
//! # Serialization
//!
//! A connection handle is not safe for two in-flight metadata operations
//! at once. Callers must serialize capability calls per physical
//! connection; the trait deliberately takes `&self` so one handle can be
//! shared across strategies, but interleaving concurrent calls on the
//! same handle is the caller's bug to avoid.
//!
//! # Cancellation
//!
//! Long catalog scans are cancelled through the connection's own
//! mechanism. Implementations should surface a cancelled statement as
//! [`MetaError::Cancelled`]; this layer propagates it unchanged.

use async_trait::async_trait;

use crate::core::value::{MetaValue, Row};
use crate::dialect::DbSettings;
use crate::error::Result;

/// A live database session, as seen by the metadata layer.
#[async_trait]
pub trait Connection: Send + Sync {
    /// The dialect id this connection reports (driver product string or a
    /// stored profile value). Matched case-insensitively against the
    /// canonical ids.
    fn dialect_id(&self) -> &str;

    /// Per-dialect behavioral flags for this connection.
    ///
    /// Usually [`DbSettings::for_dialect`] defaults, but a connection
    /// profile may override individual flags.
    fn settings(&self) -> &DbSettings;

    /// Execute a parametrized catalog query and return all rows.
    ///
    /// Parameters are bound in slice order; the SQL uses the dialect's
    /// positional placeholder syntax (the templates shipped with this
    /// crate use `?`, adapters translate where the driver needs `$n`).
    async fn query(&self, sql: &str, params: &[MetaValue]) -> Result<Vec<Row>>;

    /// Execute a single DDL/DML statement, returning the affected-row
    /// count where the driver reports one.
    async fn execute(&self, sql: &str) -> Result<u64>;

    /// Set a named savepoint in the current transaction.
    async fn set_savepoint(&self, name: &str) -> Result<()>;

    /// Release a previously set savepoint, keeping its effects.
    async fn release_savepoint(&self, name: &str) -> Result<()>;

    /// Roll back to a previously set savepoint, discarding everything
    /// after it but keeping the transaction open.
    async fn rollback_to_savepoint(&self, name: &str) -> Result<()>;

    /// Commit the current transaction.
    async fn commit(&self) -> Result<()>;

    /// Roll back the current transaction.
    async fn rollback(&self) -> Result<()>;
}
