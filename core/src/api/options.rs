//! Configuration options for the fuzzex engine.

use super::Error;
use crate::evaluator::Tolerance;
use crate::parser::parser::DEFAULT_MAX_DEPTH;

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use fuzzex_core::api::CompilationOptions;
///
/// let options = CompilationOptions {
///     delimiter: '\'',
///     ..CompilationOptions::default()
/// };
/// assert_eq!(options.escape, '\\');
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationOptions {
    /// Opens and closes string literals. Preceded by `b` it opens a byte
    /// sequence literal.
    ///
    /// Default: `"`
    pub delimiter: char,

    /// Escapes the delimiter, itself and control characters inside literals.
    ///
    /// Default: `\`
    pub escape: char,

    /// Maximum nesting depth of parentheses and operators.
    ///
    /// Default: 256
    pub max_depth: usize,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            delimiter: '"',
            escape: '\\',
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompilationOptions {
    /// Reject settings the literal extractor cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.delimiter == self.escape {
            return Err(Error::Api(format!(
                "delimiter and escape must differ, both are {:?}",
                self.delimiter
            )));
        }
        for (role, c) in [("delimiter", self.delimiter), ("escape", self.escape)] {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                return Err(Error::Api(format!("{:?} cannot be used as the {}", c, role)));
            }
        }
        if self.max_depth == 0 {
            return Err(Error::Api("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Configuration options for expression execution.
///
/// # Example
///
/// ```
/// use fuzzex_core::api::ExecutionOptions;
/// use fuzzex_core::evaluator::Tolerance;
///
/// let options = ExecutionOptions {
///     tolerance: Tolerance::proportional(0.01),
/// };
/// assert!(!options.tolerance.is_exact());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOptions {
    /// Tolerance used by `ComputedExpression::run`.
    ///
    /// Default: exact
    pub tolerance: Tolerance,
}

/// Configuration options for the fuzzex engine.
///
/// These options set the defaults for compilation and execution. Compiled
/// expressions keep the execution defaults they were built with.
///
/// # Example
///
/// ```
/// use fuzzex_core::api::{CompilationOptions, EngineOptions, ExecutionOptions};
/// use fuzzex_core::evaluator::Tolerance;
///
/// let options = EngineOptions {
///     default_compilation_options: CompilationOptions::default(),
///     default_execution_options: ExecutionOptions {
///         tolerance: Tolerance::absolute(0.5, 0.5),
///     },
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOptions {
    /// Options for compilation.
    pub default_compilation_options: CompilationOptions,

    /// Default options for execution.
    pub default_execution_options: ExecutionOptions,
}
