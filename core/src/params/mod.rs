//! Free variables of an expression.
//!
//! While an expression is being built, every parameter lives in the
//! [`ParameterRegistry`] as an [`UncompiledParameter`] whose type can still be
//! narrowed. Finalizing the registry produces an immutable
//! [`ParameterTable`] of [`CompiledParameter`]s; there is no way back other
//! than explicitly reopening a copy.

mod context;
mod registry;

pub use context::{CompiledParameter, ParameterContext, UncompiledParameter};
pub use registry::{ParameterRegistry, ParameterTable};

use crate::values::TypeSet;

/// How a numeric parameter wants its argument represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FloatPreference {
    /// Keep whatever representation the argument arrives in.
    #[default]
    Unset,
    /// Used by floating-point math; integers are widened.
    Float,
    /// Used by shifts and bitwise operators; floats must be integral.
    Integer,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("parameter '{name}' cannot be {requested}: it is already restricted to {current}")]
    Conflict {
        name: String,
        current: TypeSet,
        requested: TypeSet,
    },

    #[error("parameter '{name}' is used both as a float and as an integer")]
    PreferenceConflict { name: String },

    #[error("parameter '{name}' is used both as a producer and as a plain value")]
    ProducerConflict { name: String },

    #[error("parameter '{name}' is compiled and can no longer change")]
    Frozen { name: String },

    #[error("the type of parameter '{name}' could not be determined")]
    Unresolved { name: String },

    #[error("unknown parameter '{name}'")]
    Unknown { name: String },
}

impl ParameterError {
    pub fn name(&self) -> &str {
        match self {
            ParameterError::Conflict { name, .. }
            | ParameterError::PreferenceConflict { name }
            | ParameterError::ProducerConflict { name }
            | ParameterError::Frozen { name }
            | ParameterError::Unresolved { name }
            | ParameterError::Unknown { name } => name,
        }
    }
}
