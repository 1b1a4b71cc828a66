//! Code generation errors.

use crate::api::{Diagnostic, Severity};
use crate::parser::Span;

/// Errors that can occur while generating code for a typed tree.
///
/// The builder only hands over fully resolved trees whose parameters are all
/// in the table, so these indicate a tree assembled by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A node still has more than one candidate type.
    Unresolved { span: Span },
    /// A parameter reference with no slot in the parameter table.
    UnknownParameter { name: String, span: Span },
}

impl core::fmt::Display for CompileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CompileError::Unresolved { .. } => {
                write!(f, "Expression type was not determined")
            }
            CompileError::UnknownParameter { name, .. } => {
                write!(f, "Parameter '{}' is not in the parameter table", name)
            }
        }
    }
}

impl std::error::Error for CompileError {}

impl CompileError {
    pub fn span(&self) -> &Span {
        match self {
            CompileError::Unresolved { span } | CompileError::UnknownParameter { span, .. } => span,
        }
    }

    /// Convert to a Diagnostic for API boundary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            message: self.to_string(),
            span: self.span().clone(),
            related: Vec::new(),
            help: None,
            code: None,
        }
    }
}
