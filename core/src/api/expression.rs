//! Computed expressions.

use super::{Error, ExecutionOptions};
use crate::compiler::Program;
use crate::evaluator::{
    Argument, Scope, Slot, Tolerance, ValueFinder, bind_named, bind_positional,
};
use crate::params::{CompiledParameter, ParameterTable};
use crate::values::{Value, ValueType};

/// A compiled expression ready for execution.
///
/// A computed expression is immutable and owns everything it needs, so it can
/// be shared across threads (the engine hands out `Arc`s) and invoked any
/// number of times with different arguments and tolerances.
///
/// Arguments bind to parameters in order of first appearance in the source
/// text, or by name through a [`ValueFinder`].
///
/// # Example
///
/// ```
/// use fuzzex_core::api::Engine;
/// use fuzzex_core::evaluator::{Argument, Tolerance};
/// use fuzzex_core::values::Value;
///
/// let engine = Engine::default();
/// let expr = engine.interpret("x = y").unwrap();
/// let args = [Argument::value(1.7), Argument::value(1.9)];
///
/// assert_eq!(expr.evaluate(&args).unwrap(), Value::Bool(false));
/// let loose = Tolerance::absolute(0.2, 0.2);
/// assert_eq!(expr.compute(&loose, &args).unwrap(), Value::Bool(true));
/// ```
#[derive(Debug)]
pub struct ComputedExpression {
    source: String,
    exact: Program,
    tolerant: Program,
    parameters: ParameterTable,
    return_type: ValueType,
    options: ExecutionOptions,
}

impl ComputedExpression {
    /// Create a new computed expression.
    ///
    /// This is called internally by Engine::compile().
    pub(crate) fn new(
        source: String,
        exact: Program,
        tolerant: Program,
        parameters: ParameterTable,
        return_type: ValueType,
        options: ExecutionOptions,
    ) -> Self {
        Self {
            source,
            exact,
            tolerant,
            parameters,
            return_type,
            options,
        }
    }

    /// Evaluate with positional arguments, one per parameter.
    pub fn compute(&self, tolerance: &Tolerance, args: &[Argument]) -> Result<Value, Error> {
        let slots = bind_positional(&self.parameters, args)?;
        self.execute(tolerance, &slots)
    }

    /// Evaluate with arguments looked up by parameter name.
    pub fn compute_with(
        &self,
        tolerance: &Tolerance,
        finder: &dyn ValueFinder,
    ) -> Result<Value, Error> {
        let slots = bind_named(&self.parameters, finder)?;
        self.execute(tolerance, &slots)
    }

    /// Evaluate with exact comparisons.
    pub fn evaluate(&self, args: &[Argument]) -> Result<Value, Error> {
        self.compute(&Tolerance::EXACT, args)
    }

    /// Evaluate with the engine's default tolerance.
    pub fn run(&self, args: &[Argument]) -> Result<Value, Error> {
        self.compute(&self.options.tolerance, args)
    }

    fn execute(&self, tolerance: &Tolerance, slots: &[Slot]) -> Result<Value, Error> {
        let program = if tolerance.is_exact() {
            &self.exact
        } else {
            &self.tolerant
        };
        program
            .run(&Scope::new(slots, tolerance))
            .map_err(Error::from)
    }

    /// Parameter names in binding order.
    pub fn parameters(&self) -> Vec<&str> {
        self.parameters.names()
    }

    /// Full parameter descriptions in binding order.
    pub fn dump_parameters(&self) -> &[CompiledParameter] {
        self.parameters.as_slice()
    }

    /// The frozen parameter table, e.g. to seed a related compilation.
    pub fn parameter_table(&self) -> &ParameterTable {
        &self.parameters
    }

    pub fn return_type(&self) -> ValueType {
        self.return_type
    }

    /// The text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}
