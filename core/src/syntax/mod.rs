pub mod extract;

pub use extract::{Constant, Extracted, PLACEHOLDER_PREFIX, extract_constants};
