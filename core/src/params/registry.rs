use hashbrown::{HashMap, HashSet};

use crate::params::{
    CompiledParameter, FloatPreference, ParameterContext, ParameterError, UncompiledParameter,
};
use crate::values::{TypeSet, ValueType};

/// Name to context map for the parameters of one expression under
/// construction.
#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    entries: HashMap<String, ParameterContext>,
    // Names advertised by the expression being built. Seeded entries
    // outside this set are dropped by `finalize`.
    referenced: HashSet<String>,
    next_order: usize,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with independent copies of `table`'s
    /// parameters. Names seen for the first time are ordered after them.
    /// Seeded parameters the new expression never references are left out
    /// of the finalized table.
    pub fn seeded(table: &ParameterTable) -> Self {
        let mut registry = Self::new();
        for parameter in table.iter() {
            registry.clone_from(&ParameterContext::Compiled(parameter.clone()));
        }
        registry
    }

    /// Get the parameter named `name`, creating it with the next appearance
    /// order if it is new.
    pub fn advertise(&mut self, name: &str) -> &ParameterContext {
        if !self.referenced.contains(name) {
            self.referenced.insert(name.to_string());
        }
        let next_order = &mut self.next_order;
        self.entries.entry_ref(name).or_insert_with(|| {
            let order = *next_order;
            *next_order += 1;
            ParameterContext::Uncompiled(UncompiledParameter::new(name, order))
        })
    }

    /// Insert an independent uncompiled copy of `context`, keeping its
    /// type, order and flags. Replaces any entry with the same name.
    pub fn clone_from(&mut self, context: &ParameterContext) -> &ParameterContext {
        let copy = context.to_uncompiled();
        self.next_order = self.next_order.max(copy.order() + 1);
        let name = copy.name().to_string();
        self.entries.insert(name.clone(), ParameterContext::Uncompiled(copy));
        &self.entries[&name]
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ParameterContext> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut ParameterContext, ParameterError> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| ParameterError::Unknown {
                name: name.to_string(),
            })
    }

    /// Intersect the parameter's types with `allowed`; returns the result.
    pub fn narrow(&mut self, name: &str, allowed: TypeSet) -> Result<TypeSet, ParameterError> {
        let context = self.entry_mut(name)?;
        context.narrow(allowed)?;
        Ok(context.types())
    }

    pub fn force(&mut self, name: &str, ty: ValueType) -> Result<(), ParameterError> {
        self.entry_mut(name)?.force(ty).map(|_| ())
    }

    pub fn prefer(&mut self, name: &str, preference: FloatPreference) -> Result<(), ParameterError> {
        self.entry_mut(name)?.prefer(preference)
    }

    pub fn mark_producer(&mut self, name: &str, producer: bool) -> Result<(), ParameterError> {
        self.entry_mut(name)?.mark_producer(producer)
    }

    /// The lowest-order parameter whose type is still ambiguous.
    pub fn first_unresolved(&self) -> Option<&ParameterContext> {
        self.entries
            .values()
            .filter(|context| context.value_type().is_none())
            .min_by_key(|context| context.order())
    }

    /// All parameters in order of first appearance.
    pub fn dump(&self) -> Vec<&ParameterContext> {
        let mut contexts: Vec<_> = self.entries.values().collect();
        contexts.sort_by_key(|context| context.order());
        contexts
    }

    /// Freeze every referenced parameter, renumbering orders to slots.
    /// Fails if any type is still ambiguous.
    pub fn finalize(self) -> Result<ParameterTable, ParameterError> {
        let referenced = self.referenced;
        let mut contexts: Vec<_> = self
            .entries
            .into_values()
            .filter(|context| referenced.contains(context.name()))
            .collect();
        contexts.sort_by_key(|context| context.order());
        let parameters = contexts
            .into_iter()
            .enumerate()
            .map(|(slot, context)| {
                let parameter = match context {
                    ParameterContext::Uncompiled(p) => p.compile(),
                    ParameterContext::Compiled(p) => Ok(p),
                };
                parameter.map(|p| p.with_order(slot))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParameterTable { parameters })
    }
}

/// The frozen parameters of a compiled expression, in order of first
/// appearance. A parameter's position is its argument slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTable {
    parameters: Vec<CompiledParameter>,
}

impl ParameterTable {
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&CompiledParameter> {
        self.parameters.get(slot)
    }

    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledParameter> {
        self.parameters.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.parameters.iter().map(CompiledParameter::name).collect()
    }

    pub fn as_slice(&self) -> &[CompiledParameter] {
        &self.parameters
    }
}
