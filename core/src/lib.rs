//! Compiler and runtime for fuzzex expressions.
//!
//! Text goes through literal extraction ([`syntax`]), parsing ([`parser`]),
//! type determination and constant folding ([`analyzer`], [`ast`]) and code
//! generation ([`compiler`]). The [`api`] module ties the stages together
//! behind a caching [`api::Engine`].

pub mod analyzer;
pub mod api;
pub mod ast;
pub mod casting;
pub mod compiler;
pub mod diagnostics;
pub mod evaluator;
pub mod params;
pub mod parser;
pub mod stdlib;
pub mod syntax;
pub mod values;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_cache() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
