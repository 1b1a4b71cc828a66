use crate::api::{Diagnostic, Severity};
use crate::diagnostics::context::Context;
use crate::params::ParameterError;
use crate::parser::Span;

/// Type error with context
#[derive(Debug, Clone)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub source: String,
    pub context: Vec<Context>,
}

impl core::fmt::Display for TypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;

        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }

        if let Some(ref help) = diagnostic.help {
            write!(f, "\nhelp: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for TypeError {}

/// Specific kinds of type errors
#[derive(Debug, Clone, PartialEq)]
pub enum TypeErrorKind {
    /// No assignment of types makes the expression valid
    NotLogicallyValid {
        message: String,
        span: Span,
        /// The parameter whose type could not be satisfied, if any
        parameter: Option<String>,
    },
    /// Call to a function that is not a builtin
    UnknownFunction { name: String, span: Span },
    /// Builtin called with the wrong number of arguments
    ArityMismatch {
        name: String,
        expected: String,
        found: usize,
        span: Span,
    },
    /// Attempt to change a parameter that is already compiled
    FrozenParameter { name: String, span: Span },
    /// Evaluating a constant sub-expression failed
    Fold { message: String, span: Span },
}

impl TypeErrorKind {
    /// Get the span of the error
    pub fn span(&self) -> Span {
        match self {
            TypeErrorKind::NotLogicallyValid { span, .. } => span.clone(),
            TypeErrorKind::UnknownFunction { span, .. } => span.clone(),
            TypeErrorKind::ArityMismatch { span, .. } => span.clone(),
            TypeErrorKind::FrozenParameter { span, .. } => span.clone(),
            TypeErrorKind::Fold { span, .. } => span.clone(),
        }
    }

    pub fn not_logically_valid(message: impl Into<String>, span: Span) -> Self {
        TypeErrorKind::NotLogicallyValid {
            message: message.into(),
            span,
            parameter: None,
        }
    }

    /// Attach a source location to a registry failure.
    pub fn from_parameter(err: ParameterError, span: Span) -> Self {
        match err {
            ParameterError::Frozen { name } => TypeErrorKind::FrozenParameter { name, span },
            err => TypeErrorKind::NotLogicallyValid {
                message: err.to_string(),
                parameter: Some(err.name().to_string()),
                span,
            },
        }
    }
}

impl TypeError {
    /// Create a new TypeError with no context
    pub fn new(kind: TypeErrorKind, source: String) -> Self {
        Self {
            kind,
            source,
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context.push(context);
        self
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, code, help) = match &self.kind {
            TypeErrorKind::NotLogicallyValid { message, .. } => (
                format!("Expression is not logically valid: {}", message),
                "T001",
                None,
            ),
            TypeErrorKind::UnknownFunction { name, .. } => (
                format!("Unknown function '{}'", name),
                "T002",
                Some("Only builtin functions take arguments; `name()` refers to a producer"),
            ),
            TypeErrorKind::ArityMismatch {
                name,
                expected,
                found,
                ..
            } => (
                format!(
                    "Function '{}' takes {} argument(s), found {}",
                    name, expected, found
                ),
                "T003",
                None,
            ),
            TypeErrorKind::FrozenParameter { name, .. } => (
                format!("Parameter '{}' is compiled and cannot change", name),
                "T004",
                Some("Seed a new registry to refine compiled parameters"),
            ),
            TypeErrorKind::Fold { message, .. } => (
                format!("Constant expression cannot be evaluated: {}", message),
                "T005",
                None,
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.kind.span(),
            related: self
                .context
                .iter()
                .map(|ctx| ctx.to_related_info())
                .collect(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}
