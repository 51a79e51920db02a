//! # dbmeta
//!
//! Cross-dialect database schema introspection.
//!
//! This library normalizes schema metadata retrieval (table columns,
//! check constraints, primary and foreign keys, views, triggers, stored
//! routines, enumerated types, pending-transaction state) across the
//! SQL dialects that expose this information through incompatible system
//! catalogs and driver quirks:
//!
//! - **Unified value model** for identifiers, keys, routines and
//!   constraints, constructed fresh per query and owned by the caller
//! - **Per-dialect strategies** resolved once per connection through
//!   [`DbMetadata`], with a baseline for unrecognized dialects
//! - **Driver repair**: type codes corrected where drivers misreport them
//! - **Graceful degradation**: restricted catalogs and missing
//!   capabilities surface as empty results or distinguished conditions,
//!   never as opaque failures
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbmeta::{Connection, DbMetadata, TableIdentifier};
//!
//! async fn print_constraints(conn: &dyn Connection) {
//!     let meta = DbMetadata::for_connection(conn);
//!     let table = TableIdentifier::with_schema("public", "orders");
//!     for c in meta.constraint_reader().table_constraints(conn, &table).await {
//!         println!("{}", c.expression);
//!     }
//! }
//! ```

pub mod connection;
pub mod core;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod probe;
pub mod readers;
pub mod registry;
pub mod types;

#[cfg(test)]
mod testutil;

// Re-exports for convenient access
pub use connection::Connection;
pub use crate::core::{
    ColumnIdentifier, ConstraintExpression, ConstraintScope, DataTypeDescriptor, EnumIdentifier,
    FkDefinition, MetaValue, ObjectType, PkDefinition, ProcedureDefinition, Row, SourceState,
    TableIdentifier, TriggerDefinition, ViewDefinition,
};
pub use ddl::DropExecutor;
pub use dialect::{DbSettings, DialectId};
pub use error::{MetaError, Result};
pub use probe::TransactionProbe;
pub use readers::{
    ConstraintReader, EnumReader, ForeignKeyHandler, ProcedureFilter, ProcedureReader,
    TableDefinitionReader, TriggerReader, ViewReader, ViewSourceOptions,
};
pub use registry::DbMetadata;
pub use types::DataTypeResolver;
