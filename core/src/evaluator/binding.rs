//! Argument binding.
//!
//! Arguments arrive positionally (ordered by parameter appearance) or through
//! a [`ValueFinder`]. Binding checks them against the frozen parameter table
//! and produces the slots generated code reads from.

use core::fmt;
use core::hash::BuildHasher;
use std::collections::HashMap;
use std::sync::Arc;

use crate::casting::{self, CastError};
use crate::evaluator::{ExecutionError, Tolerance};
use crate::params::{CompiledParameter, FloatPreference, ParameterTable};
use crate::values::{Value, ValueType};

/// A host callback that yields a value on demand.
pub type Producer = Arc<dyn Fn() -> Result<Value, ExecutionError> + Send + Sync>;

/// One argument for a computed expression.
#[derive(Clone)]
pub enum Argument {
    Value(Value),
    Producer(Producer),
}

impl Argument {
    pub fn value(value: impl Into<Value>) -> Self {
        Argument::Value(value.into())
    }

    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, ExecutionError> + Send + Sync + 'static,
    {
        Argument::Producer(Arc::new(f))
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Argument::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Value(value)
    }
}

/// Looks up arguments by parameter name.
pub trait ValueFinder {
    fn find(&self, name: &str) -> Option<Argument>;
}

impl<S: BuildHasher> ValueFinder for HashMap<String, Argument, S> {
    fn find(&self, name: &str) -> Option<Argument> {
        self.get(name).cloned()
    }
}

impl<S: BuildHasher> ValueFinder for HashMap<String, Value, S> {
    fn find(&self, name: &str) -> Option<Argument> {
        self.get(name).cloned().map(Argument::Value)
    }
}

/// Adapts a closure into a [`ValueFinder`].
pub struct FnFinder<F>(pub F);

impl<F> ValueFinder for FnFinder<F>
where
    F: Fn(&str) -> Option<Argument>,
{
    fn find(&self, name: &str) -> Option<Argument> {
        (self.0)(name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("expected {expected} argument(s), got {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("no value found for parameter '{name}'")]
    Missing { name: String },

    #[error("parameter '{name}' expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("parameter '{name}': {source}")]
    InvalidCast {
        name: String,
        #[source]
        source: CastError,
    },

    /// A plain parameter was given a producer and calling it failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// A bound argument as seen by generated code.
#[derive(Clone)]
pub(crate) enum Slot {
    Ready(Value),
    /// Producer parameters are resolved at every point of use.
    Lazy {
        producer: Producer,
        name: Arc<str>,
        expected: ValueType,
        preference: FloatPreference,
    },
}

impl Slot {
    fn resolve(&self) -> Result<Value, ExecutionError> {
        match self {
            Slot::Ready(value) => Ok(value.clone()),
            Slot::Lazy {
                producer,
                name,
                expected,
                preference,
            } => {
                let value = producer()?;
                conform(&value, *expected, *preference).map_err(|err| match err {
                    Conform::Type(found) => ExecutionError::TypeMismatch {
                        name: name.to_string(),
                        expected: *expected,
                        found,
                    },
                    Conform::Cast(source) => ExecutionError::InvalidCast(source),
                })
            }
        }
    }
}

enum Conform {
    Type(ValueType),
    Cast(CastError),
}

/// Check the value's kind and coerce numbers per the preference.
fn conform(
    value: &Value,
    expected: ValueType,
    preference: FloatPreference,
) -> Result<Value, Conform> {
    if value.value_type() != expected {
        return Err(Conform::Type(value.value_type()));
    }
    match value {
        Value::Number(n) => casting::coerce(*n, preference)
            .map(Value::Number)
            .map_err(Conform::Cast),
        other => Ok(other.clone()),
    }
}

fn bind_one(parameter: &CompiledParameter, argument: Argument) -> Result<Slot, BindingError> {
    let ready = |value: Value| {
        conform(&value, parameter.value_type(), parameter.preference())
            .map(Slot::Ready)
            .map_err(|err| match err {
                Conform::Type(found) => BindingError::TypeMismatch {
                    name: parameter.name().to_string(),
                    expected: parameter.value_type(),
                    found,
                },
                Conform::Cast(source) => BindingError::InvalidCast {
                    name: parameter.name().to_string(),
                    source,
                },
            })
    };
    match argument {
        Argument::Value(value) => ready(value),
        Argument::Producer(producer) if parameter.is_producer() => Ok(Slot::Lazy {
            producer,
            name: Arc::from(parameter.name()),
            expected: parameter.value_type(),
            preference: parameter.preference(),
        }),
        // A plain parameter takes a single snapshot.
        Argument::Producer(producer) => ready(producer()?),
    }
}

/// Bind positional arguments, ordered by parameter appearance.
pub(crate) fn bind_positional(
    parameters: &ParameterTable,
    arguments: &[Argument],
) -> Result<Vec<Slot>, BindingError> {
    if arguments.len() != parameters.len() {
        return Err(BindingError::ArgumentCount {
            expected: parameters.len(),
            found: arguments.len(),
        });
    }
    parameters
        .iter()
        .zip(arguments)
        .map(|(parameter, argument)| bind_one(parameter, argument.clone()))
        .collect()
}

/// Bind arguments by looking each parameter up in `finder`.
pub(crate) fn bind_named(
    parameters: &ParameterTable,
    finder: &dyn ValueFinder,
) -> Result<Vec<Slot>, BindingError> {
    parameters
        .iter()
        .map(|parameter| {
            let argument = finder.find(parameter.name()).ok_or_else(|| BindingError::Missing {
                name: parameter.name().to_string(),
            })?;
            bind_one(parameter, argument)
        })
        .collect()
}

/// Per-call state handed to generated code.
pub struct Scope<'a> {
    slots: &'a [Slot],
    tolerance: &'a Tolerance,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(slots: &'a [Slot], tolerance: &'a Tolerance) -> Self {
        Self { slots, tolerance }
    }

    pub fn tolerance(&self) -> &Tolerance {
        self.tolerance
    }

    /// The value of the parameter in `slot`, calling its producer if needed.
    pub fn argument(&self, slot: usize, name: &str) -> Result<Value, ExecutionError> {
        self.slots
            .get(slot)
            .ok_or_else(|| ExecutionError::Unbound(name.to_string()))?
            .resolve()
    }
}
