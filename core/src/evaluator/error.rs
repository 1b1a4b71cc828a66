//! Runtime evaluation errors.
//!
//! Type conflicts are caught when the expression is compiled, so the errors
//! left at evaluation time are the ones that depend on argument values.

use crate::casting::CastError;
use crate::values::ValueType;

/// Error raised while evaluating a computed expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    /// A non-integral float reached an integer-only operation.
    #[error("invalid cast: {0}")]
    InvalidCast(#[from] CastError),

    /// A producer returned a value of the wrong kind.
    #[error("type mismatch for '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        found: ValueType,
    },

    /// Operand kinds the operator has no implementation for.
    #[error("operator '{op}' cannot combine {left} and {right}")]
    InvalidOperands {
        op: &'static str,
        left: ValueType,
        right: ValueType,
    },

    /// A builtin received an argument of the wrong kind.
    #[error("invalid argument {position} for '{function}'")]
    InvalidArgument {
        function: &'static str,
        position: usize,
    },

    /// A host-supplied producer failed.
    #[error("producer failed: {0}")]
    Producer(String),

    /// The compiled code referenced a parameter slot with no bound value.
    #[error("parameter '{0}' is not bound")]
    Unbound(String),
}

impl ExecutionError {
    /// Convenience for producers reporting their own failures.
    pub fn producer(message: impl Into<String>) -> Self {
        ExecutionError::Producer(message.into())
    }
}
