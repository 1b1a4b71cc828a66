//! String coercion through host-supplied formatters.

use crate::values::Value;
use std::sync::Arc;

/// Converts a value to text for string concatenation.
///
/// Returning `None` passes the value on to the next formatter in the chain.
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: &Value) -> Option<String>;
}

impl<F> ValueFormatter for F
where
    F: Fn(&Value) -> Option<String> + Send + Sync,
{
    fn format(&self, value: &Value) -> Option<String> {
        self(value)
    }
}

/// An ordered chain of formatters. The first one to produce text wins; if
/// none does, the value's `Display` representation is used.
#[derive(Clone, Default)]
pub struct Formatters {
    chain: Arc<Vec<Arc<dyn ValueFormatter>>>,
}

impl Formatters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a formatter at the end of the chain.
    pub fn push(&mut self, formatter: Arc<dyn ValueFormatter>) {
        Arc::make_mut(&mut self.chain).push(formatter);
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Render a value as text.
    pub fn format(&self, value: &Value) -> String {
        if let Value::Str(s) = value {
            return s.clone();
        }
        self.chain
            .iter()
            .find_map(|formatter| formatter.format(value))
            .unwrap_or_else(|| value.to_string())
    }
}

impl core::fmt::Debug for Formatters {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Formatters")
            .field("len", &self.chain.len())
            .finish()
    }
}
