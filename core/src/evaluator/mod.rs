//! Runtime support for compiled expressions.
//!
//! The operator implementations here are shared by constant folding and by
//! generated code. Tolerances, argument binding and the per-call [`Scope`]
//! also live here.

mod binding;
mod error;
pub mod operators;
mod tolerance;

pub use binding::{Argument, BindingError, FnFinder, Producer, Scope, ValueFinder};
pub(crate) use binding::{Slot, bind_named, bind_positional};
pub use error::ExecutionError;
pub use tolerance::Tolerance;
