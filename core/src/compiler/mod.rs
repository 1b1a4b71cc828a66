//! Code generation for typed expression trees.
//!
//! A typed, simplified [`Node`](crate::ast::Node) tree is turned into a tree
//! of boxed closures. Each expression gets two programs:
//!
//! - [`Mode::Exact`] compares numbers exactly and never reads the tolerance.
//! - [`Mode::Tolerant`] relaxes numeric comparisons by the tolerance the
//!   caller passes in the [`Scope`](crate::evaluator::Scope).
//!
//! Every other node compiles to the same closure in both modes. Operators
//! call into [`evaluator::operators`](crate::evaluator::operators), the same
//! functions constant folding uses.

mod codegen;
mod error;

#[cfg(test)]
mod codegen_test;

pub use codegen::{Mode, Program, Thunk, generate};
pub use error::CompileError;
