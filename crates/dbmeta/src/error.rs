//! Error types for metadata operations.

use thiserror::Error;

/// Main error type for schema introspection operations.
#[derive(Error, Debug)]
pub enum MetaError {
    /// A database object that was expected to exist could not be located.
    ///
    /// Raised by readers when the requested table/view/routine is absent
    /// from the catalog at query time. Callers batching over many objects
    /// typically skip on this condition rather than abort.
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// An optional capability has no implementation for the current dialect.
    ///
    /// Raised e.g. when routine source retrieval is requested on a dialect
    /// with no documented way to obtain it. Callers should surface this as
    /// "unavailable", not as a failure.
    #[error("Capability '{capability}' is not configured for dialect '{dialect}'")]
    CapabilityNotConfigured { capability: String, dialect: String },

    /// A catalog query or DDL statement failed to execute.
    #[error("Execution failed ({context}): {message}")]
    Execution { context: String, message: String },

    /// The connection handle itself reported a failure (lost session,
    /// savepoint rejected, commit/rollback refused).
    #[error("Connection error: {0}")]
    Connection(String),

    /// An identifier failed validation before being embedded in SQL.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The operation was cancelled through the connection's own
    /// cancellation mechanism.
    #[error("Operation cancelled")]
    Cancelled,
}

impl MetaError {
    /// Create an Execution error with context about where it occurred.
    pub fn execution(context: impl Into<String>, message: impl Into<String>) -> Self {
        MetaError::Execution {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a CapabilityNotConfigured error.
    pub fn not_configured(capability: impl Into<String>, dialect: impl Into<String>) -> Self {
        MetaError::CapabilityNotConfigured {
            capability: capability.into(),
            dialect: dialect.into(),
        }
    }

    /// True if this error is the distinguished "object not found" condition.
    pub fn is_object_not_found(&self) -> bool {
        matches!(self, MetaError::ObjectNotFound(_))
    }

    /// True if this error is the distinguished "capability not configured"
    /// condition.
    pub fn is_capability_not_configured(&self) -> bool {
        matches!(self, MetaError::CapabilityNotConfigured { .. })
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetaError>;
