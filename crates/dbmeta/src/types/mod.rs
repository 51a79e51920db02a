//! Driver type codes and per-dialect type resolution.

pub mod codes;
mod resolver;

pub use resolver::{
    DataTypeResolver, DefaultTypeResolver, MysqlTypeResolver, OracleTypeResolver,
    SqlServerTypeResolver, ValueClass,
};
