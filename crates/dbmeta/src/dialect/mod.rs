//! Dialect identification.
//!
//! Every supported DBMS family has one canonical [`DialectId`] holding the
//! wire string a connection reports for it. Matching a reported id is
//! case-insensitive and tolerant of the common aliases drivers use
//! ("postgres" vs "postgresql", "mssql" vs "microsoft_sql_server").
//! Unrecognized ids resolve to no dialect at all, which every capability
//! treats as "use the baseline strategy".

mod settings;

pub use settings::DbSettings;

/// Identifier quoting convention of a dialect family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// ANSI double quotes: `"name"`.
    DoubleQuote,
    /// Square brackets: `[name]` (SQL Server, ASE).
    Bracket,
    /// Backticks: `` `name` `` (MySQL family).
    Backtick,
}

/// Canonical identifiers for the supported DBMS families.
///
/// The enum is closed: adding a dialect means adding a variant here and a
/// row to the relevant capability tables, not a new conditional chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectId {
    Postgres,
    Greenplum,
    Redshift,
    Oracle,
    SqlServer,
    Mysql,
    MariaDb,
    Firebird,
    /// DB2 for Linux/Unix/Windows.
    Db2Lu,
    /// DB2 for IBM i (iSeries).
    Db2I,
    /// DB2 for z/OS.
    Db2Z,
    H2,
    Hsqldb,
    Derby,
    Sqlite,
    Informix,
    /// SAP/Sybase SQL Anywhere.
    SqlAnywhere,
    /// Sybase Adaptive Server Enterprise.
    SybaseAse,
    Cubrid,
    Vertica,
    Exasol,
    MonetDb,
    /// SAP MaxDB.
    MaxDb,
}

impl DialectId {
    /// All supported dialects, for registry iteration and tests.
    pub const ALL: &'static [DialectId] = &[
        DialectId::Postgres,
        DialectId::Greenplum,
        DialectId::Redshift,
        DialectId::Oracle,
        DialectId::SqlServer,
        DialectId::Mysql,
        DialectId::MariaDb,
        DialectId::Firebird,
        DialectId::Db2Lu,
        DialectId::Db2I,
        DialectId::Db2Z,
        DialectId::H2,
        DialectId::Hsqldb,
        DialectId::Derby,
        DialectId::Sqlite,
        DialectId::Informix,
        DialectId::SqlAnywhere,
        DialectId::SybaseAse,
        DialectId::Cubrid,
        DialectId::Vertica,
        DialectId::Exasol,
        DialectId::MonetDb,
        DialectId::MaxDb,
    ];

    /// The canonical wire string for this dialect.
    pub fn wire_id(&self) -> &'static str {
        match self {
            DialectId::Postgres => "postgresql",
            DialectId::Greenplum => "greenplum",
            DialectId::Redshift => "redshift",
            DialectId::Oracle => "oracle",
            DialectId::SqlServer => "microsoft_sql_server",
            DialectId::Mysql => "mysql",
            DialectId::MariaDb => "mariadb",
            DialectId::Firebird => "firebird",
            DialectId::Db2Lu => "db2",
            DialectId::Db2I => "db2i",
            DialectId::Db2Z => "db2z",
            DialectId::H2 => "h2",
            DialectId::Hsqldb => "hsql_database_engine",
            DialectId::Derby => "apache_derby",
            DialectId::Sqlite => "sqlite",
            DialectId::Informix => "informix_dynamic_server",
            DialectId::SqlAnywhere => "sql_anywhere",
            DialectId::SybaseAse => "adaptive_server_enterprise",
            DialectId::Cubrid => "cubrid",
            DialectId::Vertica => "vertica_database",
            DialectId::Exasol => "exasolution",
            DialectId::MonetDb => "monetdb",
            DialectId::MaxDb => "sap_db",
        }
    }

    /// Resolve a connection-reported id to a canonical dialect.
    ///
    /// Comparison is case-insensitive; the common driver aliases are
    /// accepted alongside the canonical wire string. Returns `None` for
    /// anything unrecognized; callers fall back to baseline strategies.
    pub fn from_reported(reported: &str) -> Option<DialectId> {
        let id = reported.trim().to_lowercase();
        match id.as_str() {
            "postgresql" | "postgres" | "pg" => Some(DialectId::Postgres),
            "greenplum" => Some(DialectId::Greenplum),
            "redshift" | "amazon_redshift" => Some(DialectId::Redshift),
            "oracle" => Some(DialectId::Oracle),
            "microsoft_sql_server" | "mssql" | "sqlserver" | "sql_server" => {
                Some(DialectId::SqlServer)
            }
            "mysql" => Some(DialectId::Mysql),
            "mariadb" => Some(DialectId::MariaDb),
            "firebird" | "firebirdsql" => Some(DialectId::Firebird),
            "db2" | "db2lu" | "db2/lu" => Some(DialectId::Db2Lu),
            "db2i" | "db2/400" => Some(DialectId::Db2I),
            "db2z" | "db2/z" => Some(DialectId::Db2Z),
            "h2" => Some(DialectId::H2),
            "hsql_database_engine" | "hsqldb" | "hsql" => Some(DialectId::Hsqldb),
            "apache_derby" | "derby" => Some(DialectId::Derby),
            "sqlite" | "sqlite3" => Some(DialectId::Sqlite),
            "informix_dynamic_server" | "informix" => Some(DialectId::Informix),
            "sql_anywhere" | "sybase_asa" => Some(DialectId::SqlAnywhere),
            "adaptive_server_enterprise" | "sybase" | "sybase_ase" => Some(DialectId::SybaseAse),
            "cubrid" => Some(DialectId::Cubrid),
            "vertica_database" | "vertica" => Some(DialectId::Vertica),
            "exasolution" | "exasol" => Some(DialectId::Exasol),
            "monetdb" => Some(DialectId::MonetDb),
            "sap_db" | "maxdb" => Some(DialectId::MaxDb),
            _ => None,
        }
    }

    /// Identifier quoting convention for this dialect.
    pub fn quote_style(&self) -> QuoteStyle {
        match self {
            DialectId::SqlServer | DialectId::SybaseAse => QuoteStyle::Bracket,
            DialectId::Mysql | DialectId::MariaDb => QuoteStyle::Backtick,
            _ => QuoteStyle::DoubleQuote,
        }
    }

    /// True for the dialects that descend from the PostgreSQL code base
    /// and share its system catalogs.
    pub fn is_postgres_family(&self) -> bool {
        matches!(
            self,
            DialectId::Postgres | DialectId::Greenplum | DialectId::Redshift
        )
    }
}

impl std::fmt::Display for DialectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_id())
    }
}
