use crate::params::{FloatPreference, ParameterError};
use crate::values::{TypeSet, ValueType};

/// A parameter whose type is still being determined.
#[derive(Debug, Clone, PartialEq)]
pub struct UncompiledParameter {
    name: String,
    types: TypeSet,
    preference: FloatPreference,
    // `None` until the first reference decides it.
    producer: Option<bool>,
    order: usize,
}

impl UncompiledParameter {
    pub fn new(name: impl Into<String>, order: usize) -> Self {
        Self {
            name: name.into(),
            types: TypeSet::all(),
            preference: FloatPreference::Unset,
            producer: None,
            order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> TypeSet {
        self.types
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.types.single()
    }

    pub fn is_resolved(&self) -> bool {
        self.value_type().is_some()
    }

    pub fn preference(&self) -> FloatPreference {
        self.preference
    }

    pub fn is_producer(&self) -> bool {
        self.producer == Some(true)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Intersect the supportable types with `allowed`. Returns whether the
    /// set changed.
    pub fn narrow(&mut self, allowed: TypeSet) -> Result<bool, ParameterError> {
        let narrowed = self.types & allowed;
        if narrowed.is_empty() {
            return Err(ParameterError::Conflict {
                name: self.name.clone(),
                current: self.types,
                requested: allowed,
            });
        }
        let changed = narrowed != self.types;
        self.types = narrowed;
        Ok(changed)
    }

    /// Pin the parameter to a single type.
    pub fn force(&mut self, ty: ValueType) -> Result<bool, ParameterError> {
        self.narrow(TypeSet::from(ty))
    }

    pub fn prefer(&mut self, preference: FloatPreference) -> Result<(), ParameterError> {
        match (self.preference, preference) {
            (_, FloatPreference::Unset) => Ok(()),
            (FloatPreference::Unset, _) => {
                self.preference = preference;
                Ok(())
            }
            (current, requested) if current == requested => Ok(()),
            _ => Err(ParameterError::PreferenceConflict {
                name: self.name.clone(),
            }),
        }
    }

    /// Record how the parameter is referenced (`name()` versus `name`).
    /// Every reference must agree.
    pub fn mark_producer(&mut self, producer: bool) -> Result<(), ParameterError> {
        match self.producer {
            None => {
                self.producer = Some(producer);
                Ok(())
            }
            Some(current) if current == producer => Ok(()),
            Some(_) => Err(ParameterError::ProducerConflict {
                name: self.name.clone(),
            }),
        }
    }

    pub fn compile(self) -> Result<CompiledParameter, ParameterError> {
        let Some(value_type) = self.types.single() else {
            return Err(ParameterError::Unresolved { name: self.name });
        };
        Ok(CompiledParameter {
            name: self.name,
            value_type,
            preference: self.preference,
            producer: self.producer.unwrap_or(false),
            order: self.order,
        })
    }
}

/// A parameter of a compiled expression. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledParameter {
    name: String,
    value_type: ValueType,
    preference: FloatPreference,
    producer: bool,
    order: usize,
}

impl CompiledParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn preference(&self) -> FloatPreference {
        self.preference
    }

    pub fn is_producer(&self) -> bool {
        self.producer
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub(crate) fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// An independent, mutable copy with the same type, order and flags.
    pub fn reopen(&self) -> UncompiledParameter {
        UncompiledParameter {
            name: self.name.clone(),
            types: TypeSet::from(self.value_type),
            preference: self.preference,
            producer: Some(self.producer),
            order: self.order,
        }
    }
}

/// A parameter in either state.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterContext {
    Uncompiled(UncompiledParameter),
    Compiled(CompiledParameter),
}

impl ParameterContext {
    pub fn name(&self) -> &str {
        match self {
            ParameterContext::Uncompiled(p) => p.name(),
            ParameterContext::Compiled(p) => p.name(),
        }
    }

    pub fn order(&self) -> usize {
        match self {
            ParameterContext::Uncompiled(p) => p.order(),
            ParameterContext::Compiled(p) => p.order(),
        }
    }

    pub fn types(&self) -> TypeSet {
        match self {
            ParameterContext::Uncompiled(p) => p.types(),
            ParameterContext::Compiled(p) => TypeSet::from(p.value_type()),
        }
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.types().single()
    }

    pub fn preference(&self) -> FloatPreference {
        match self {
            ParameterContext::Uncompiled(p) => p.preference(),
            ParameterContext::Compiled(p) => p.preference(),
        }
    }

    pub fn is_producer(&self) -> bool {
        match self {
            ParameterContext::Uncompiled(p) => p.is_producer(),
            ParameterContext::Compiled(p) => p.is_producer(),
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, ParameterContext::Compiled(_))
    }

    /// Mutable access, refused once the parameter is compiled.
    pub fn as_uncompiled_mut(&mut self) -> Result<&mut UncompiledParameter, ParameterError> {
        match self {
            ParameterContext::Uncompiled(p) => Ok(p),
            ParameterContext::Compiled(p) => Err(ParameterError::Frozen {
                name: p.name().to_string(),
            }),
        }
    }

    pub fn narrow(&mut self, allowed: TypeSet) -> Result<bool, ParameterError> {
        self.as_uncompiled_mut()?.narrow(allowed)
    }

    pub fn force(&mut self, ty: ValueType) -> Result<bool, ParameterError> {
        self.as_uncompiled_mut()?.force(ty)
    }

    pub fn prefer(&mut self, preference: FloatPreference) -> Result<(), ParameterError> {
        self.as_uncompiled_mut()?.prefer(preference)
    }

    pub fn mark_producer(&mut self, producer: bool) -> Result<(), ParameterError> {
        self.as_uncompiled_mut()?.mark_producer(producer)
    }

    /// An independent uncompiled copy, whatever the current state.
    pub fn to_uncompiled(&self) -> UncompiledParameter {
        match self {
            ParameterContext::Uncompiled(p) => p.clone(),
            ParameterContext::Compiled(p) => p.reopen(),
        }
    }
}

impl From<UncompiledParameter> for ParameterContext {
    fn from(p: UncompiledParameter) -> Self {
        ParameterContext::Uncompiled(p)
    }
}

impl From<CompiledParameter> for ParameterContext {
    fn from(p: CompiledParameter) -> Self {
        ParameterContext::Compiled(p)
    }
}
