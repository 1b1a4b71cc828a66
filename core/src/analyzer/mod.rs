pub mod analyzer;
pub mod error;


pub use analyzer::{Analysis, analyze};
pub use error::{TypeError, TypeErrorKind};
