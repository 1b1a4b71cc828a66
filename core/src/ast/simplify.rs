//! Constant folding.
//!
//! A node whose operands are all constants is evaluated at compile time with
//! the same operator functions the generated code calls. Folding is
//! all-or-nothing per node: `1 + 2 + x` folds `1 + 2` but leaves the outer
//! `+` alone. Comparisons between numeric constants are never folded.

use crate::analyzer::TypeErrorKind;
use crate::ast::{Node, NodeKind};
use crate::evaluator::{ExecutionError, operators};
use crate::values::{Formatters, Value, ValueType};

/// Fold `node` if every operand is a constant; otherwise return it unchanged.
///
/// Numeric comparisons are the exception: `1 = 1.5` stays a comparison even
/// though both sides are constant, so the tolerance given to each
/// computation still applies to it.
///
/// Operands are expected to be simplified already (nodes are built bottom
/// up), so this looks one level deep. Simplifying a simplified node is a
/// no-op.
pub fn simplify(node: Node, formatters: &Formatters) -> Result<Node, TypeErrorKind> {
    if !is_foldable(&node) {
        return Ok(node);
    }
    let value = fold(&node, formatters).map_err(|err| TypeErrorKind::Fold {
        message: err.to_string(),
        span: node.span.clone(),
    })?;
    Ok(Node::constant(value, node.span))
}

/// Simplify a whole tree, operands first.
pub fn simplify_tree(mut node: Node, formatters: &Formatters) -> Result<Node, TypeErrorKind> {
    node.kind = match node.kind {
        NodeKind::Negate(operand) => {
            NodeKind::Negate(Box::new(simplify_tree(*operand, formatters)?))
        }
        NodeKind::Arithmetic { op, left, right } => NodeKind::Arithmetic {
            op,
            left: Box::new(simplify_tree(*left, formatters)?),
            right: Box::new(simplify_tree(*right, formatters)?),
        },
        NodeKind::Logical { op, left, right } => NodeKind::Logical {
            op,
            left: Box::new(simplify_tree(*left, formatters)?),
            right: Box::new(simplify_tree(*right, formatters)?),
        },
        NodeKind::Shift { op, left, right } => NodeKind::Shift {
            op,
            left: Box::new(simplify_tree(*left, formatters)?),
            right: Box::new(simplify_tree(*right, formatters)?),
        },
        NodeKind::Comparison { op, left, right } => NodeKind::Comparison {
            op,
            left: Box::new(simplify_tree(*left, formatters)?),
            right: Box::new(simplify_tree(*right, formatters)?),
        },
        NodeKind::Call { function, args } => NodeKind::Call {
            function,
            args: args
                .into_iter()
                .map(|arg| simplify_tree(arg, formatters))
                .collect::<Result<_, _>>()?,
        },
        leaf @ (NodeKind::Constant(_) | NodeKind::Parameter { .. }) => leaf,
    };
    simplify(node, formatters)
}

fn is_foldable(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Constant(_) | NodeKind::Parameter { .. } => false,
        // Numeric comparisons depend on the tolerance given at run time.
        NodeKind::Comparison { left, .. } if left.types.has(ValueType::Numeric) => false,
        _ => node.children().iter().all(|child| child.is_constant()),
    }
}

fn fold(node: &Node, formatters: &Formatters) -> Result<Value, ExecutionError> {
    let operands: Vec<&Value> = node
        .children()
        .into_iter()
        .filter_map(Node::as_constant)
        .collect();
    match (&node.kind, operands.as_slice()) {
        (NodeKind::Negate(_), [value]) => operators::negate(value),
        (NodeKind::Arithmetic { op, .. }, [l, r]) => operators::binary(*op, l, r, formatters),
        (NodeKind::Logical { op, .. }, [l, r]) => operators::bitwise(*op, l, r),
        (NodeKind::Shift { op, .. }, [l, r]) => operators::shift(*op, l, r),
        (NodeKind::Comparison { op, .. }, [l, r]) => {
            operators::compare(*op, l, r).map(Value::Bool)
        }
        (NodeKind::Call { function, .. }, _) => {
            let args: Vec<Value> = operands.into_iter().cloned().collect();
            function.call(&args, formatters)
        }
        _ => Err(ExecutionError::Unbound(node.operator_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casting::CastError;
    use crate::parser::{BinaryOp, ComparisonOp, ShiftOp, Span};
    use crate::values::TypeSet;
    use pretty_assertions::assert_eq;

    fn constant(value: impl Into<Value>) -> Box<Node> {
        Box::new(Node::constant(value.into(), Span::new(0, 1)))
    }

    fn parameter(name: &str) -> Box<Node> {
        Box::new(Node::parameter(name, false, TypeSet::NUMERIC, Span::new(0, 1)))
    }

    fn binary(op: BinaryOp, left: Box<Node>, right: Box<Node>) -> Node {
        Node::operator(NodeKind::Arithmetic { op, left, right }, Span::new(0, 5))
    }

    #[test]
    fn test_folds_constant_operands() {
        let node = binary(BinaryOp::Mul, constant(6i64), constant(7i64));
        let folded = simplify(node, &Formatters::new()).unwrap();
        assert_eq!(folded.as_constant(), Some(&Value::int(42)));
        assert_eq!(folded.span, Span::new(0, 5));
    }

    #[test]
    fn test_leaves_partial_nodes_alone() {
        let node = binary(BinaryOp::Add, constant(1i64), parameter("x"));
        let simplified = simplify(node.clone(), &Formatters::new()).unwrap();
        assert_eq!(simplified, node);
    }

    #[test]
    fn test_addition_folds_the_same_in_either_order() {
        let pairs = [
            (Value::int(1), Value::int(2)),
            (Value::int(1), Value::float(2.5)),
            (Value::float(1.5), Value::float(2.5)),
            (Value::int(-4), Value::float(0.25)),
        ];
        for (a, b) in pairs {
            let ab = simplify(
                binary(BinaryOp::Add, constant(a.clone()), constant(b.clone())),
                &Formatters::new(),
            )
            .unwrap();
            let ba = simplify(binary(BinaryOp::Add, constant(b), constant(a)), &Formatters::new())
                .unwrap();
            assert!(ab.is_constant());
            assert_eq!(ab.as_constant(), ba.as_constant());
        }
    }

    #[test]
    fn test_string_concatenation_uses_formatters() {
        let node = binary(BinaryOp::Add, constant("n="), constant(1.5));
        let folded = simplify(node, &Formatters::new()).unwrap();
        assert_eq!(folded.as_constant(), Some(&Value::str("n=1.5")));
    }

    #[test]
    fn test_numeric_comparison_is_not_folded() {
        let node = Node::operator(
            NodeKind::Comparison {
                op: ComparisonOp::Eq,
                left: constant(1i64),
                right: constant(1.0),
            },
            Span::new(0, 7),
        );
        let simplified = simplify(node, &Formatters::new()).unwrap();
        assert!(!simplified.is_constant());
    }

    #[test]
    fn test_string_comparison_is_folded() {
        let node = Node::operator(
            NodeKind::Comparison {
                op: ComparisonOp::Lt,
                left: constant("a"),
                right: constant("b"),
            },
            Span::new(0, 7),
        );
        let folded = simplify(node, &Formatters::new()).unwrap();
        assert_eq!(folded.as_constant(), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_cast_fault_is_a_compile_error() {
        let node = Node::operator(
            NodeKind::Shift {
                op: ShiftOp::Left,
                left: constant(1.5),
                right: constant(2i64),
            },
            Span::new(0, 8),
        );
        let err = simplify(node, &Formatters::new()).unwrap_err();
        assert_eq!(
            err,
            TypeErrorKind::Fold {
                message: ExecutionError::InvalidCast(CastError::NotIntegral { value: 1.5 }).to_string(),
                span: Span::new(0, 8),
            }
        );
    }

    #[test]
    fn test_simplify_tree_is_idempotent() {
        let inner = binary(BinaryOp::Sub, constant(10i64), constant(4i64));
        let node = binary(BinaryOp::Add, Box::new(inner), parameter("x"));
        let once = simplify_tree(node, &Formatters::new()).unwrap();
        let twice = simplify_tree(once.clone(), &Formatters::new()).unwrap();
        assert_eq!(once, twice);
        match &once.kind {
            NodeKind::Arithmetic { left, .. } => {
                assert_eq!(left.as_constant(), Some(&Value::int(6)))
            }
            other => panic!("Expected Arithmetic, got {:?}", other),
        }
    }
}
