//! Runtime values and the value-type lattice used by type determination.

pub mod bytes;
pub mod format;
mod number;
mod types;
mod value;

pub use format::{Formatters, ValueFormatter};
pub use number::Number;
pub use types::{TypeSet, ValueType};
pub use value::Value;
