mod parsed_expr;
pub mod parser;
mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::ExpressionParser;
pub use parser::Rule;
pub use parser::parse;
pub use parser::parse_with_max_depth;

pub use error::{ParseError, ParseErrorKind};
pub use parsed_expr::{Expr, ExprKind, Literal};
pub use syntax::{BinaryOp, BoolOp, ComparisonOp, ShiftOp, Span, UnaryOp};

#[cfg(test)]
mod rule_valid_test;
