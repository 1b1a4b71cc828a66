//! Public error types for the fuzzex API.
//!
//! This module defines the stable error types exposed to library users.
//! Internal errors are converted to these public types at API boundaries.

use std::fmt;

use crate::parser::Span;

/// Public error type for all fuzzex operations.
///
/// This is the stable error type exposed to library users. Internal error
/// representations may change, but this public API remains stable.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid API usage (e.g., conflicting engine options).
    Api(String),

    /// Compilation errors (parse errors, type errors).
    ///
    /// Contains one or more diagnostics with source locations and context.
    /// Spans refer to `source`, the text as it was handed to the engine.
    Compilation {
        diagnostics: Vec<Diagnostic>,
        source: String,
    },

    /// Runtime errors during evaluation (e.g., a cast fault, a failing producer).
    Runtime(String),

    /// Arguments that do not fit the expression's parameters.
    Binding(String),
}

impl Error {
    pub(crate) fn compilation(diagnostic: Diagnostic, source: &str) -> Self {
        Error::Compilation {
            diagnostics: vec![diagnostic],
            source: source.to_string(),
        }
    }

    /// Diagnostics of a compilation error; empty for every other kind.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Compilation { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Api(msg) => write!(f, "API error: {}", msg),
            Error::Compilation { diagnostics, .. } => match diagnostics.as_slice() {
                [single] => write!(f, "Compilation failed: {}", single.message),
                _ => {
                    let error_count = diagnostics
                        .iter()
                        .filter(|d| d.severity == Severity::Error)
                        .count();
                    write!(f, "Compilation failed with {} error(s)", error_count)
                }
            },
            Error::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            Error::Binding(msg) => write!(f, "Binding error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "T001") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - compilation cannot succeed.
    Error,
    /// Warning - suspicious code that might be wrong.
    Warning,
    /// Info - informational message.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g., "first used here").
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedInfo {
    /// Source location of the related information.
    pub span: Span,

    /// Message explaining the relevance.
    pub message: String,
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<crate::parser::ParseError> for Error {
    fn from(err: crate::parser::ParseError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            source: err.source,
        }
    }
}

impl From<crate::analyzer::TypeError> for Error {
    fn from(err: crate::analyzer::TypeError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            source: err.source,
        }
    }
}

impl From<crate::evaluator::ExecutionError> for Error {
    fn from(err: crate::evaluator::ExecutionError) -> Self {
        Error::Runtime(err.to_string())
    }
}

impl From<crate::evaluator::BindingError> for Error {
    fn from(err: crate::evaluator::BindingError) -> Self {
        use crate::evaluator::BindingError;
        match err {
            // A plain parameter's producer failed while taking its snapshot.
            BindingError::Execution(err) => Error::from(err),
            err => Error::Binding(err.to_string()),
        }
    }
}
