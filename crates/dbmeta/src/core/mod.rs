//! Database-agnostic value model.
//!
//! Everything a metadata query returns is built from the types in this
//! module. Instances are constructed fresh per query and owned by the
//! caller; nothing here caches or shares mutable state.

pub mod constraint;
pub mod enums;
pub mod fk;
pub mod identifier;
pub mod pk;
pub mod procedure;
pub mod source;
pub mod trigger;
pub mod value;
pub mod view;

pub use constraint::{ConstraintExpression, ConstraintScope};
pub use enums::EnumIdentifier;
pub use fk::{FkDefinition, FkRule};
pub use identifier::{
    quote_ident, validate_identifier, ColumnIdentifier, DataTypeDescriptor, ObjectType,
    TableIdentifier,
};
pub use pk::{PkColumn, PkDefinition};
pub use procedure::{
    ParameterDefinition, ParameterMode, ProcedureDefinition, ResultShape, RoutineType,
};
pub use source::SourceState;
pub use trigger::{TriggerDefinition, TriggerTiming};
pub use value::{MetaValue, Row};
pub use view::ViewDefinition;
