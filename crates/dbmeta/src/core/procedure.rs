//! Stored routine metadata.

use serde::{Deserialize, Serialize};

use super::source::SourceState;

/// Whether a routine is a procedure or a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineType {
    Procedure,
    Function,
}

/// Whether calling the routine produces a result set.
///
/// Most catalogs do not record this; `Unknown` is the normal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultShape {
    #[default]
    Unknown,
    ReturnsResult,
    NoResult,
}

/// Direction of a routine parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterMode {
    In,
    Out,
    InOut,
    Return,
}

/// One parameter of a stored routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Parameter name; unnamed (positional) parameters carry None.
    pub name: Option<String>,

    /// Native DBMS type name.
    pub dbms_type: String,

    /// Direction.
    pub mode: ParameterMode,

    /// 1-based position in the parameter list. Position 0 is the return
    /// value where the catalog models it that way.
    pub ordinal: i32,
}

/// A stored procedure or function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDefinition {
    /// Catalog qualifier, where the dialect has one.
    pub catalog: Option<String>,

    /// Schema qualifier, where the dialect has one.
    pub schema: Option<String>,

    /// Routine name as displayed.
    pub name: String,

    /// The catalog's unique name for this overload (`specific_name`);
    /// equal to `name` on dialects without overloading.
    pub specific_name: String,

    /// Procedure or function.
    pub routine_type: RoutineType,

    /// Whether a call yields a result set.
    pub result_shape: ResultShape,

    /// Ordered parameter list; empty until parameters are read.
    pub parameters: Vec<ParameterDefinition>,

    /// Routine source, loaded on demand.
    pub source: SourceState,
}

impl ProcedureDefinition {
    /// A routine with the given name; `specific_name` defaults to `name`.
    pub fn new(name: impl Into<String>, routine_type: RoutineType) -> Self {
        let name = name.into();
        Self {
            catalog: None,
            schema: None,
            specific_name: name.clone(),
            name,
            routine_type,
            result_shape: ResultShape::Unknown,
            parameters: Vec::new(),
            source: SourceState::NotLoaded,
        }
    }

    /// Render `schema.name`, including only non-empty qualifiers.
    pub fn display_expression(&self) -> String {
        match self.schema.as_deref().filter(|s| !s.is_empty()) {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}
