//! Data type resolution (Strategy pattern).
//!
//! Drivers do not always report correct type metadata: a native type the
//! driver does not know comes back as [`codes::OTHER`], some report the
//! wrong standard code outright, and a few need a specific
//! value-materialization class instead of the driver's own choice. A
//! [`DataTypeResolver`] repairs those cases per dialect; the baseline
//! implementation only formats and otherwise passes everything through
//! unchanged.

use serde::{Deserialize, Serialize};

use super::codes;

/// How a column's values should be materialized, when a dialect must
/// override the driver's own choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueClass {
    Text,
    Bytes,
    Boolean,
    Integer,
    BigInt,
    Decimal,
    Float,
    Date,
    Time,
    Timestamp,
    TimestampTz,
}

/// Per-dialect correction of driver-reported type metadata.
///
/// Implementations are stateless; one instance serves every query on a
/// connection.
pub trait DataTypeResolver: Send + Sync {
    /// Render a canonical, DDL-readable description of the type:
    /// `varchar(20)`, `numeric(12,2)`, `integer`.
    fn display_type(&self, dbms_type: &str, type_code: i32, size: i64, digits: i32) -> String {
        base_display(dbms_type, type_code, size, digits)
    }

    /// Repair a driver-reported type code known to be wrong for the given
    /// native type name. The baseline is the identity function.
    fn fix_column_type(&self, type_code: i32, _dbms_type: &str) -> i32 {
        type_code
    }

    /// Force a specific value-materialization class for this type, or
    /// `None` to defer to the driver's own reported class.
    fn column_class_override(&self, _type_code: i32, _dbms_type: &str) -> Option<ValueClass> {
        None
    }
}

/// Shared display formatting used by the baseline and most overrides.
fn base_display(dbms_type: &str, type_code: i32, size: i64, digits: i32) -> String {
    if codes::takes_size_and_digits(type_code) {
        if size > 0 && digits > 0 {
            return format!("{}({},{})", dbms_type, size, digits);
        }
        if size > 0 {
            return format!("{}({})", dbms_type, size);
        }
    }
    if codes::takes_size(type_code) && size > 0 {
        return format!("{}({})", dbms_type, size);
    }
    dbms_type.to_string()
}

/// Baseline resolver: straightforward display formatting, no corrections.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeResolver;

impl DataTypeResolver for DefaultTypeResolver {}

/// Oracle: the driver reports several native types as [`codes::OTHER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleTypeResolver;

impl DataTypeResolver for OracleTypeResolver {
    fn display_type(&self, dbms_type: &str, type_code: i32, size: i64, digits: i32) -> String {
        // NUMBER without precision is reported with size 0; render it bare.
        if dbms_type.eq_ignore_ascii_case("NUMBER") {
            return match (size > 0, digits > 0) {
                (true, true) => format!("NUMBER({},{})", size, digits),
                (true, false) => format!("NUMBER({})", size),
                _ => "NUMBER".to_string(),
            };
        }
        base_display(dbms_type, type_code, size, digits)
    }

    fn fix_column_type(&self, type_code: i32, dbms_type: &str) -> i32 {
        if type_code != codes::OTHER {
            return type_code;
        }
        match dbms_type.to_ascii_uppercase().as_str() {
            "RAW" => codes::VARBINARY,
            "LONG RAW" => codes::LONGVARBINARY,
            "LONG" => codes::LONGVARCHAR,
            "NVARCHAR2" => codes::NVARCHAR,
            "NCHAR" => codes::NCHAR,
            "NCLOB" => codes::NCLOB,
            "BINARY_FLOAT" => codes::REAL,
            "BINARY_DOUBLE" => codes::DOUBLE,
            _ => type_code,
        }
    }

    fn column_class_override(&self, _type_code: i32, dbms_type: &str) -> Option<ValueClass> {
        match dbms_type.to_ascii_uppercase().as_str() {
            "RAW" | "LONG RAW" => Some(ValueClass::Bytes),
            // DATE carries a time component; materializing it as a plain
            // date loses it.
            "DATE" => Some(ValueClass::Timestamp),
            _ => None,
        }
    }
}

/// MySQL family: TINYINT(1) comes back as BIT, YEAR as a date.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlTypeResolver;

impl DataTypeResolver for MysqlTypeResolver {
    fn fix_column_type(&self, type_code: i32, dbms_type: &str) -> i32 {
        let upper = dbms_type.to_ascii_uppercase();
        // The driver reports TINYINT(1) as BIT; the catalog spells it out.
        if upper.starts_with("TINYINT(1)") || (type_code == codes::BIT && upper.starts_with("TINYINT")) {
            return codes::BOOLEAN;
        }
        if upper == "YEAR" {
            return codes::SMALLINT;
        }
        type_code
    }

    fn column_class_override(&self, _type_code: i32, dbms_type: &str) -> Option<ValueClass> {
        match dbms_type.to_ascii_uppercase().as_str() {
            "YEAR" => Some(ValueClass::Integer),
            // Unsigned bigint exceeds the signed 64-bit range.
            "BIGINT UNSIGNED" => Some(ValueClass::Decimal),
            _ => None,
        }
    }
}

/// SQL Server: `sysname` and `datetimeoffset` are misreported.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerTypeResolver;

impl DataTypeResolver for SqlServerTypeResolver {
    fn display_type(&self, dbms_type: &str, type_code: i32, size: i64, digits: i32) -> String {
        // (N)VARCHAR(MAX) is reported with an out-of-range size.
        let upper = dbms_type.to_ascii_uppercase();
        if (upper == "VARCHAR" || upper == "NVARCHAR" || upper == "VARBINARY")
            && (size <= 0 || size > 8000)
        {
            return format!("{}(max)", dbms_type);
        }
        base_display(dbms_type, type_code, size, digits)
    }

    fn fix_column_type(&self, type_code: i32, dbms_type: &str) -> i32 {
        match dbms_type.to_ascii_uppercase().as_str() {
            "SYSNAME" => codes::NVARCHAR,
            "DATETIMEOFFSET" if type_code == codes::OTHER => codes::TIMESTAMP_WITH_TIMEZONE,
            _ => type_code,
        }
    }

    fn column_class_override(&self, _type_code: i32, dbms_type: &str) -> Option<ValueClass> {
        match dbms_type.to_ascii_uppercase().as_str() {
            // The driver materializes a vendor class for these.
            "DATETIMEOFFSET" => Some(ValueClass::TimestampTz),
            "SQL_VARIANT" => Some(ValueClass::Text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_display_formats() {
        let r = DefaultTypeResolver;
        assert_eq!(r.display_type("varchar", codes::VARCHAR, 20, 0), "varchar(20)");
        assert_eq!(
            r.display_type("numeric", codes::NUMERIC, 12, 2),
            "numeric(12,2)"
        );
        assert_eq!(r.display_type("integer", codes::INTEGER, 0, 0), "integer");
        assert_eq!(r.display_type("text", codes::LONGVARCHAR, 0, 0), "text");
    }

    #[test]
    fn test_default_fix_is_identity_for_all_inputs() {
        let r = DefaultTypeResolver;
        for code in [codes::OTHER, codes::VARCHAR, codes::TIMESTAMP, -42, 0] {
            assert_eq!(r.fix_column_type(code, "anything"), code);
            assert_eq!(r.fix_column_type(code, ""), code);
        }
    }

    #[test]
    fn test_default_never_overrides_class() {
        let r = DefaultTypeResolver;
        assert_eq!(r.column_class_override(codes::VARCHAR, "varchar"), None);
        assert_eq!(r.column_class_override(codes::OTHER, "weird"), None);
    }

    #[test]
    fn test_oracle_repairs_other_codes() {
        let r = OracleTypeResolver;
        assert_eq!(r.fix_column_type(codes::OTHER, "RAW"), codes::VARBINARY);
        assert_eq!(r.fix_column_type(codes::OTHER, "NVARCHAR2"), codes::NVARCHAR);
        assert_eq!(r.fix_column_type(codes::OTHER, "LONG"), codes::LONGVARCHAR);
        // Correctly reported codes are left alone.
        assert_eq!(r.fix_column_type(codes::VARCHAR, "VARCHAR2"), codes::VARCHAR);
    }

    #[test]
    fn test_oracle_number_display() {
        let r = OracleTypeResolver;
        assert_eq!(r.display_type("NUMBER", codes::NUMERIC, 10, 2), "NUMBER(10,2)");
        assert_eq!(r.display_type("NUMBER", codes::NUMERIC, 10, 0), "NUMBER(10)");
        assert_eq!(r.display_type("NUMBER", codes::NUMERIC, 0, 0), "NUMBER");
    }

    #[test]
    fn test_oracle_date_materializes_as_timestamp() {
        let r = OracleTypeResolver;
        assert_eq!(
            r.column_class_override(codes::DATE, "DATE"),
            Some(ValueClass::Timestamp)
        );
    }

    #[test]
    fn test_mysql_tinyint1_is_boolean() {
        let r = MysqlTypeResolver;
        assert_eq!(r.fix_column_type(codes::BIT, "TINYINT"), codes::BOOLEAN);
        assert_eq!(r.fix_column_type(codes::TINYINT, "tinyint(1)"), codes::BOOLEAN);
        assert_eq!(r.fix_column_type(codes::DATE, "YEAR"), codes::SMALLINT);
        assert_eq!(r.fix_column_type(codes::BIT, "BIT"), codes::BIT);
    }

    #[test]
    fn test_sqlserver_sysname_and_max_types() {
        let r = SqlServerTypeResolver;
        assert_eq!(r.fix_column_type(codes::OTHER, "sysname"), codes::NVARCHAR);
        assert_eq!(
            r.display_type("nvarchar", codes::NVARCHAR, -1, 0),
            "nvarchar(max)"
        );
        assert_eq!(
            r.display_type("nvarchar", codes::NVARCHAR, 50, 0),
            "nvarchar(50)"
        );
    }
}
