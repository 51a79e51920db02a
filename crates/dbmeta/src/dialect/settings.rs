//! Per-dialect configuration flags.
//!
//! A [`DbSettings`] value travels with the connection handle and steers
//! strategy selection in the registry. The flags are plain data so a
//! caller can override individual entries (a connection profile may know
//! better than the built-in defaults, e.g. for a fork of a supported
//! engine reporting a custom id).

use serde::{Deserialize, Serialize};

use super::DialectId;

/// Behavioral flags for one dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbSettings {
    /// DDL statements run inside the regular transaction and require an
    /// explicit COMMIT (DB2, Firebird, Derby, PostgreSQL with autocommit
    /// off). Oracle-style implicit DDL commit leaves this false.
    #[serde(default)]
    pub ddl_needs_commit: bool,

    /// The driver misreports foreign keys for this dialect; use the
    /// corrective retrieval path instead of the standard one.
    #[serde(default)]
    pub fk_uses_corrective_path: bool,

    /// Catalog probes must run inside a savepoint because any failed
    /// statement poisons the open transaction (PostgreSQL family).
    #[serde(default)]
    pub probe_needs_savepoint: bool,

    /// Verb appended to `DROP TABLE` when dependent objects must be
    /// dropped along with it. Absent when the dialect needs none.
    #[serde(default)]
    pub drop_cascade_verb: Option<String>,

    /// Unquoted identifiers keep their case when compared (most dialects
    /// fold; a handful compare case-sensitively).
    #[serde(default)]
    pub case_sensitive_identifiers: bool,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            ddl_needs_commit: false,
            fk_uses_corrective_path: false,
            probe_needs_savepoint: false,
            drop_cascade_verb: None,
            case_sensitive_identifiers: false,
        }
    }
}

impl DbSettings {
    /// Built-in defaults for a resolved dialect.
    ///
    /// `None` (unrecognized dialect) gets the ANSI-ish baseline: no DDL
    /// commit discipline, no cascade verb, standard FK path.
    pub fn for_dialect(dialect: Option<DialectId>) -> Self {
        let Some(d) = dialect else {
            return Self::default();
        };

        let mut s = Self::default();

        match d {
            DialectId::Postgres | DialectId::Greenplum | DialectId::Redshift => {
                s.ddl_needs_commit = true;
                s.probe_needs_savepoint = true;
                s.drop_cascade_verb = Some("CASCADE".to_string());
            }
            DialectId::Oracle => {
                // DDL commits implicitly.
                s.drop_cascade_verb = Some("CASCADE CONSTRAINTS".to_string());
            }
            DialectId::Firebird | DialectId::Db2Lu | DialectId::Db2I | DialectId::Db2Z => {
                s.ddl_needs_commit = true;
            }
            DialectId::Derby => {
                s.ddl_needs_commit = true;
            }
            DialectId::SqlServer => {
                s.fk_uses_corrective_path = true;
            }
            DialectId::H2 | DialectId::Hsqldb => {
                s.drop_cascade_verb = Some("CASCADE".to_string());
            }
            DialectId::Mysql
            | DialectId::MariaDb
            | DialectId::Sqlite
            | DialectId::Informix
            | DialectId::SqlAnywhere
            | DialectId::SybaseAse
            | DialectId::Cubrid
            | DialectId::Vertica
            | DialectId::Exasol
            | DialectId::MonetDb
            | DialectId::MaxDb => {}
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_dialect_gets_baseline() {
        let s = DbSettings::for_dialect(None);
        assert_eq!(s, DbSettings::default());
        assert!(!s.ddl_needs_commit);
        assert!(s.drop_cascade_verb.is_none());
    }

    #[test]
    fn test_postgres_family_shares_flags() {
        for d in [
            DialectId::Postgres,
            DialectId::Greenplum,
            DialectId::Redshift,
        ] {
            let s = DbSettings::for_dialect(Some(d));
            assert!(s.ddl_needs_commit);
            assert!(s.probe_needs_savepoint);
            assert_eq!(s.drop_cascade_verb.as_deref(), Some("CASCADE"));
        }
    }

    #[test]
    fn test_oracle_cascades_without_commit() {
        let s = DbSettings::for_dialect(Some(DialectId::Oracle));
        assert!(!s.ddl_needs_commit);
        assert_eq!(s.drop_cascade_verb.as_deref(), Some("CASCADE CONSTRAINTS"));
    }

    #[test]
    fn test_sqlserver_uses_corrective_fk_path() {
        let s = DbSettings::for_dialect(Some(DialectId::SqlServer));
        assert!(s.fk_uses_corrective_path);
    }

    #[test]
    fn test_settings_survive_serde() {
        let s = DbSettings::for_dialect(Some(DialectId::Firebird));
        let json = serde_json::to_string(&s).unwrap();
        let back: DbSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
