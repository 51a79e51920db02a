//! Single-object destructive DDL.

use tracing::{debug, warn};

use crate::connection::Connection;
use crate::core::identifier::TableIdentifier;
use crate::dialect::DialectId;
use crate::error::Result;

/// Executes single-object DROP statements with the dialect's commit
/// discipline.
pub struct DropExecutor {
    dialect: Option<DialectId>,
}

impl DropExecutor {
    pub fn for_dialect(dialect: Option<DialectId>) -> Self {
        Self { dialect }
    }

    /// Drop one table (or view, per the identifier's object type tag).
    ///
    /// The statement is `DROP <kind> <qualified-name> [<cascade-verb>]`,
    /// with the cascade verb taken from the connection's settings only
    /// when the dialect needs one. On dialects requiring explicit DDL
    /// transaction control the drop is committed on success; on failure
    /// the transaction is rolled back and the original failure re-raised.
    pub async fn drop_table(&self, conn: &dyn Connection, table: &TableIdentifier) -> Result<()> {
        let qualified = table.qualified_expression(self.dialect)?;

        let mut sql = format!("DROP {} {}", table.object_type.keyword(), qualified);
        if let Some(verb) = &conn.settings().drop_cascade_verb {
            sql.push(' ');
            sql.push_str(verb);
        }

        debug!(statement = %sql, "dropping object");
        let needs_commit = conn.settings().ddl_needs_commit;

        match conn.execute(&sql).await {
            Ok(_) => {
                if needs_commit {
                    conn.commit().await?;
                }
                Ok(())
            }
            Err(e) => {
                if needs_commit {
                    if let Err(rb) = conn.rollback().await {
                        warn!(error = %rb, "rollback after failed drop also failed");
                    }
                }
                Err(e)
            }
        }
    }
}
