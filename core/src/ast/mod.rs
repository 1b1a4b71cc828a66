//! The typed expression tree built from a parsed expression.

mod node;
pub mod signature;
mod simplify;

pub use node::{Node, NodeKind};
pub use signature::Overload;
pub use simplify::{simplify, simplify_tree};

#[cfg(test)]
mod node_test;
