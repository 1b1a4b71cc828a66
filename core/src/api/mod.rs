//! Public API for the fuzzex expression language.
//!
//! An [`Engine`] compiles expression text into a [`ComputedExpression`] and
//! caches it by text. A computed expression is immutable; each call binds
//! its own arguments and tolerance.
//!
//! # Example
//!
//! ```
//! use fuzzex_core::api::Engine;
//! use fuzzex_core::evaluator::{Argument, Tolerance};
//! use fuzzex_core::values::Value;
//!
//! let engine = Engine::default();
//! let expr = engine.interpret("x > y").unwrap();
//! let args = [Argument::value(1i64), Argument::value(1.5)];
//!
//! // Exact comparison.
//! assert_eq!(expr.evaluate(&args).unwrap(), Value::Bool(false));
//!
//! // Within 50% of either operand counts as greater.
//! let tolerance = Tolerance::proportional(0.5);
//! assert_eq!(expr.compute(&tolerance, &args).unwrap(), Value::Bool(true));
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod options;

pub use engine::Engine;
pub use error::{Diagnostic, Error, RelatedInfo, Severity};
pub use expression::ComputedExpression;
pub use options::{CompilationOptions, EngineOptions, ExecutionOptions};
