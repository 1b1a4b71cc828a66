//! Closure code generation.

use core::fmt;

use tracing::trace;

use crate::ast::{Node, NodeKind};
use crate::compiler::CompileError;
use crate::evaluator::{ExecutionError, Scope, operators};
use crate::params::ParameterTable;
use crate::parser::{BoolOp, ComparisonOp};
use crate::values::{Formatters, Value, ValueType};

/// A compiled subexpression.
pub type Thunk = Box<dyn Fn(&Scope<'_>) -> Result<Value, ExecutionError> + Send + Sync>;

/// Which comparison semantics a [`Program`] was generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every comparison is exact; the call's tolerance is never consulted.
    Exact,
    /// Numeric comparisons are relaxed by the call's tolerance.
    Tolerant,
}

/// Executable form of a typed tree.
pub struct Program {
    mode: Mode,
    root: Thunk,
}

impl Program {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn run(&self, scope: &Scope<'_>) -> Result<Value, ExecutionError> {
        (self.root)(scope)
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program").field("mode", &self.mode).finish()
    }
}

/// Generate a [`Program`] for `node`.
///
/// Parameters read the slot assigned to them in `parameters`. String
/// coercion in `+` and in builtins goes through `formatters`.
pub fn generate(
    node: &Node,
    mode: Mode,
    formatters: &Formatters,
    parameters: &ParameterTable,
) -> Result<Program, CompileError> {
    let generator = Generator {
        mode,
        formatters,
        parameters,
    };
    let root = generator.node(node)?;
    trace!(?mode, "Generated program");
    Ok(Program { mode, root })
}

fn thunk<F>(f: F) -> Thunk
where
    F: Fn(&Scope<'_>) -> Result<Value, ExecutionError> + Send + Sync + 'static,
{
    Box::new(f)
}

struct Generator<'a> {
    mode: Mode,
    formatters: &'a Formatters,
    parameters: &'a ParameterTable,
}

impl Generator<'_> {
    fn node(&self, node: &Node) -> Result<Thunk, CompileError> {
        let Some(ty) = node.value_type() else {
            return Err(CompileError::Unresolved {
                span: node.span.clone(),
            });
        };
        match &node.kind {
            NodeKind::Constant(value) => {
                let value = value.clone();
                Ok(thunk(move |_| Ok(value.clone())))
            }
            NodeKind::Parameter { name, .. } => {
                let slot = self.parameters.slot_of(name).ok_or_else(|| {
                    CompileError::UnknownParameter {
                        name: name.clone(),
                        span: node.span.clone(),
                    }
                })?;
                let name = name.clone();
                Ok(thunk(move |scope| scope.argument(slot, &name)))
            }
            NodeKind::Negate(operand) => {
                let operand = self.node(operand)?;
                Ok(thunk(move |scope| operators::negate(&operand(scope)?)))
            }
            NodeKind::Arithmetic { op, left, right } => {
                let (op, left, right) = (*op, self.node(left)?, self.node(right)?);
                let formatters = self.formatters.clone();
                Ok(thunk(move |scope| {
                    operators::binary(op, &left(scope)?, &right(scope)?, &formatters)
                }))
            }
            NodeKind::Logical { op, left, right } if ty == ValueType::Boolean => {
                Ok(short_circuit(*op, self.node(left)?, self.node(right)?))
            }
            NodeKind::Logical { op, left, right } => {
                let (op, left, right) = (*op, self.node(left)?, self.node(right)?);
                Ok(thunk(move |scope| {
                    operators::bitwise(op, &left(scope)?, &right(scope)?)
                }))
            }
            NodeKind::Shift { op, left, right } => {
                let (op, left, right) = (*op, self.node(left)?, self.node(right)?);
                Ok(thunk(move |scope| {
                    operators::shift(op, &left(scope)?, &right(scope)?)
                }))
            }
            NodeKind::Comparison { op, left, right } => {
                let numeric = left.value_type() == Some(ValueType::Numeric);
                let (left, right) = (self.node(left)?, self.node(right)?);
                if numeric && self.mode == Mode::Tolerant {
                    Ok(tolerant_comparison(*op, left, right))
                } else {
                    Ok(exact_comparison(*op, left, right))
                }
            }
            NodeKind::Call { function, args } => {
                let function = *function;
                let args = args
                    .iter()
                    .map(|arg| self.node(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let formatters = self.formatters.clone();
                Ok(thunk(move |scope| {
                    let values = args
                        .iter()
                        .map(|arg| arg(scope))
                        .collect::<Result<Vec<_>, _>>()?;
                    function.call(&values, &formatters)
                }))
            }
        }
    }
}

/// Boolean `&` and `|`: the right operand is skipped, producers included,
/// once the left operand decides the result.
fn short_circuit(op: BoolOp, left: Thunk, right: Thunk) -> Thunk {
    thunk(move |scope| {
        let value = left(scope)?;
        let Some(decided) = value.as_bool() else {
            return Err(ExecutionError::InvalidOperands {
                op: op.symbol(),
                left: value.value_type(),
                right: ValueType::Boolean,
            });
        };
        match (op, decided) {
            (BoolOp::And, false) | (BoolOp::Or, true) => Ok(value),
            _ => right(scope),
        }
    })
}

fn exact_comparison(op: ComparisonOp, left: Thunk, right: Thunk) -> Thunk {
    thunk(move |scope| {
        operators::compare(op, &left(scope)?, &right(scope)?).map(Value::Bool)
    })
}

fn tolerant_comparison(op: ComparisonOp, left: Thunk, right: Thunk) -> Thunk {
    thunk(move |scope| {
        operators::compare_tolerant(op, &left(scope)?, &right(scope)?, scope.tolerance())
            .map(Value::Bool)
    })
}
