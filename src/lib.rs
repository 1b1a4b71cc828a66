//! fuzzex - compiled expressions with tolerant numeric comparison
//!
//! # Overview
//!
//! fuzzex compiles short arithmetic, logical, string and byte-sequence
//! expressions once and evaluates them many times. Parameter types are
//! inferred from how they are used, constant subexpressions are folded at
//! compile time, and numeric comparisons can be relaxed per call by a
//! [`Tolerance`]. Common use cases include:
//!
//! - Measurement checks against reference values
//! - Rule engines over sensor or telemetry data
//! - User-supplied filter expressions
//!
//! # Quick Start
//!
//! ```
//! use fuzzex::{Argument, Engine, Tolerance, Value};
//!
//! let engine = Engine::default();
//! let expr = engine.interpret("reading = expected").unwrap();
//! assert_eq!(expr.parameters(), vec!["reading", "expected"]);
//!
//! let args = [Argument::value(1.7), Argument::value(1.9)];
//! assert_eq!(expr.evaluate(&args).unwrap(), Value::Bool(false));
//!
//! let tolerance = Tolerance::absolute(0.2, 0.2);
//! assert_eq!(expr.compute(&tolerance, &args).unwrap(), Value::Bool(true));
//! ```
//!
//! # Producers
//!
//! A zero-argument call such as `now()` refers to a *producer* parameter.
//! Its argument is a callback invoked at every point of use; short-circuit
//! `&` and `|` skip it when the left operand decides the result.
//!
//! ```
//! use fuzzex::{Argument, Engine, Value};
//!
//! let engine = Engine::default();
//! let expr = engine.interpret("ready() | retries > 3").unwrap();
//! let result = expr
//!     .evaluate(&[Argument::producer(|| Ok(Value::Bool(true))), Argument::value(0i64)])
//!     .unwrap();
//! assert_eq!(result, Value::Bool(true));
//! ```

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from fuzzex_core
pub use fuzzex_core::api::{
    CompilationOptions, ComputedExpression, Diagnostic, Engine, EngineOptions, Error,
    ExecutionOptions, RelatedInfo, Severity,
};

// Re-export commonly used types and values
pub use fuzzex_core::evaluator::{
    Argument, ExecutionError, FnFinder, Producer, Tolerance, ValueFinder,
};
pub use fuzzex_core::params::{CompiledParameter, FloatPreference};
pub use fuzzex_core::values::{self, Formatters, Number, Value, ValueFormatter, ValueType};
