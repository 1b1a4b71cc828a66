use crate::api::{Diagnostic, Severity};
use crate::diagnostics::context::Context;
use crate::parser::parser::INVALID_NUMBER;
use crate::parser::{Rule, Span};

/// Parser error with context
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
    pub context: Vec<Context>,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Invalid number literal
    InvalidNumber { text: String },
    /// Maximum nesting depth exceeded
    MaxDepthExceeded { depth: usize, max_depth: usize },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

impl ParseError {
    /// Create a new ParseError with no context
    pub fn new(kind: ParseErrorKind, source: String, span: Span) -> Self {
        Self {
            kind,
            source,
            span,
            context: Vec::new(),
        }
    }

    /// Move the error into the coordinates of another source text.
    pub fn relocate(mut self, source: &str, map: impl Fn(&Span) -> Span) -> Self {
        self.span = map(&self.span);
        self.source = source.to_string();
        self
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => (
                format!("Expected {}, found {}", expected, found),
                "P001",
                None,
            ),
            ParseErrorKind::InvalidNumber { text } => (
                format!("Invalid number literal '{}'", text),
                "P003",
                Some("Integers must fit in 64 bits; use a decimal point for larger values"),
            ),
            ParseErrorKind::MaxDepthExceeded { max_depth, .. } => (
                format!(
                    "Expression nesting depth exceeds maximum of {} levels",
                    max_depth
                ),
                "P004",
                Some("Reduce nesting or simplify the expression"),
            ),
            ParseErrorKind::Other { message } => (message.clone(), "P999", None),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.span.clone(),
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

impl core::fmt::Display for ParseError {
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

impl std::error::Error for ParseError {}

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => {
            let expected = format_expected_rules(&positives);
            let found = if span.start() >= source.len() {
                "end of input".to_string()
            } else {
                format_found_rules(&negatives, &source[span.start()..])
            };
            ParseErrorKind::UnexpectedToken { expected, found }
        }
        ErrorVariant::CustomError { message } => match message.strip_prefix(INVALID_NUMBER) {
            Some(text) => ParseErrorKind::InvalidNumber {
                text: text.to_string(),
            },
            None => ParseErrorKind::Other { message },
        },
    };

    ParseError::new(kind, source.to_string(), span)
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    // Group related rules into higher-level concepts
    let mut concepts: Vec<&str> = Vec::new();

    for rule in rules {
        let concept = match rule {
            Rule::integer | Rule::float | Rule::boolean => "literal",
            Rule::ident | Rule::call => "identifier",
            Rule::EOI => "end of input",
            Rule::add
            | Rule::sub
            | Rule::mul
            | Rule::div
            | Rule::pow
            | Rule::and
            | Rule::or
            | Rule::shl
            | Rule::shr
            | Rule::eq
            | Rule::ne
            | Rule::gt
            | Rule::ge
            | Rule::lt
            | Rule::le => "operator",
            _ => "expression",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((only, [])) => only.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Format found rules in a human-readable way
fn format_found_rules(rules: &[Rule], rest: &str) -> String {
    match rules.first() {
        Some(Rule::ident) => "identifier".to_string(),
        Some(Rule::integer) => "integer".to_string(),
        Some(Rule::float) => "floating-point number".to_string(),
        Some(Rule::boolean) => "boolean".to_string(),
        Some(rule) => format!("{:?}", rule),
        None => match rest.chars().next() {
            Some(c) => format!("'{}'", c),
            None => "end of input".to_string(),
        },
    }
}
