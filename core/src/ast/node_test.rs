use super::*;
use crate::analyzer::TypeErrorKind;
use crate::params::ParameterRegistry;
use crate::parser::{BinaryOp, BoolOp, ComparisonOp, Span};
use crate::values::{TypeSet, Value, ValueType};
use pretty_assertions::assert_eq;

fn span() -> Span {
    Span::new(0, 1)
}

fn constant(value: impl Into<Value>) -> Box<Node> {
    Box::new(Node::constant(value.into(), span()))
}

fn parameter(registry: &mut ParameterRegistry, name: &str) -> Box<Node> {
    let types = registry.advertise(name).types();
    Box::new(Node::parameter(name, false, types, span()))
}

fn arithmetic(op: BinaryOp, left: Box<Node>, right: Box<Node>) -> Node {
    Node::operator(NodeKind::Arithmetic { op, left, right }, span())
}

fn param_types(registry: &ParameterRegistry, name: &str) -> TypeSet {
    registry.get(name).unwrap().types()
}

#[test]
fn test_operator_starts_with_all_results() {
    let mut registry = ParameterRegistry::new();
    let x = parameter(&mut registry, "x");
    let y = parameter(&mut registry, "y");
    let node = arithmetic(BinaryOp::Add, x, y);
    assert_eq!(
        node.types,
        TypeSet::NUMERIC | TypeSet::STRING | TypeSet::BYTE_SEQUENCE
    );
    assert_eq!(Node::negate(*constant(1i64), span()).types, TypeSet::NUMERIC);
}

#[test]
fn test_constant_narrowing() {
    let mut registry = ParameterRegistry::new();
    let mut node = *constant(1i64);
    assert_eq!(node.determine_weakly(TypeSet::all(), &mut registry), Ok(false));
    assert_eq!(node.determine_weakly(TypeSet::NUMERIC, &mut registry), Ok(false));
    assert!(matches!(
        node.determine_weakly(TypeSet::STRING, &mut registry),
        Err(TypeErrorKind::NotLogicallyValid { .. })
    ));
}

#[test]
fn test_settle_pushes_types_into_parameters() {
    let mut registry = ParameterRegistry::new();
    let x = parameter(&mut registry, "x");
    let mut node = arithmetic(BinaryOp::Add, x, constant(1i64));
    assert_eq!(node.settle(&mut registry), Ok(true));

    // Only N + N -> N and S + N -> S survive.
    assert_eq!(node.types, TypeSet::NUMERIC | TypeSet::STRING);
    assert_eq!(param_types(&registry, "x"), TypeSet::NUMERIC | TypeSet::STRING);
}

#[test]
fn test_negation_resolves_its_operand() {
    let mut registry = ParameterRegistry::new();
    let x = parameter(&mut registry, "x");
    let mut node = Node::negate(*x, span());
    node.settle(&mut registry).unwrap();
    assert_eq!(node.value_type(), Some(ValueType::Numeric));
    assert_eq!(param_types(&registry, "x"), TypeSet::NUMERIC);
}

#[test]
fn test_ordering_against_string_literal() {
    let mut registry = ParameterRegistry::new();
    let x = parameter(&mut registry, "x");
    let mut node = Node::operator(
        NodeKind::Comparison {
            op: ComparisonOp::Lt,
            left: x,
            right: constant("a"),
        },
        span(),
    );
    node.settle(&mut registry).unwrap();
    assert_eq!(node.value_type(), Some(ValueType::Boolean));
    assert_eq!(param_types(&registry, "x"), TypeSet::STRING);
}

#[test]
fn test_boolean_plus_number_is_not_valid() {
    let mut registry = ParameterRegistry::new();
    let mut node = arithmetic(BinaryOp::Add, constant(true), constant(5i64));
    match node.settle(&mut registry) {
        Err(TypeErrorKind::NotLogicallyValid { message, .. }) => {
            assert_eq!(message, "operator '+' cannot be applied to Boolean and Numeric")
        }
        other => panic!("Expected NotLogicallyValid, got {:?}", other),
    }
}

#[test]
fn test_determine_strongly_flows_down() {
    let mut registry = ParameterRegistry::new();
    let x = parameter(&mut registry, "x");
    let mut node = arithmetic(BinaryOp::Add, x, constant(1i64));
    node.settle(&mut registry).unwrap();

    assert_eq!(node.determine_strongly(ValueType::String, &mut registry), Ok(true));
    assert_eq!(node.types, TypeSet::STRING);
    assert_eq!(param_types(&registry, "x"), TypeSet::STRING);
}

#[test]
fn test_determine_strongly_outside_the_set_fails() {
    let mut registry = ParameterRegistry::new();
    let mut node = arithmetic(BinaryOp::Sub, constant(1i64), constant(2i64));
    node.settle(&mut registry).unwrap();
    assert!(node.determine_strongly(ValueType::Boolean, &mut registry).is_err());
    // The failed attempt changed nothing.
    assert_eq!(node.types, TypeSet::NUMERIC);
}

#[test]
fn test_conflicting_uses_of_a_parameter() {
    let mut registry = ParameterRegistry::new();
    let x = parameter(&mut registry, "x");
    let mut logical = Node::operator(
        NodeKind::Logical {
            op: BoolOp::And,
            left: x,
            right: constant(true),
        },
        span(),
    );
    logical.settle(&mut registry).unwrap();
    assert_eq!(param_types(&registry, "x"), TypeSet::BOOLEAN);

    // A second, stale reference to `x` is narrowed to Numeric by `-`.
    let stale = Node::parameter("x", false, TypeSet::all(), span());
    let mut negate = Node::negate(stale, span());
    match negate.settle(&mut registry) {
        Err(TypeErrorKind::NotLogicallyValid { parameter, .. }) => {
            assert_eq!(parameter.as_deref(), Some("x"))
        }
        other => panic!("Expected NotLogicallyValid, got {:?}", other),
    }
}

#[test]
fn test_refine_shares_information_between_uses() {
    let mut registry = ParameterRegistry::new();
    // (x + y) = (x - 1): the numeric right side pins the left side, and the
    // stale `x` on the right learns about it from the registry.
    let left = arithmetic(
        BinaryOp::Add,
        parameter(&mut registry, "x"),
        parameter(&mut registry, "y"),
    );
    let right = arithmetic(BinaryOp::Sub, parameter(&mut registry, "x"), constant(1i64));
    let mut node = Node::operator(
        NodeKind::Comparison {
            op: ComparisonOp::Eq,
            left: Box::new(left),
            right: Box::new(right),
        },
        span(),
    );
    node.settle(&mut registry).unwrap();
    while node.refine(&mut registry).unwrap() {}

    assert_eq!(param_types(&registry, "x"), TypeSet::NUMERIC);
    assert_eq!(param_types(&registry, "y"), TypeSet::NUMERIC);
    for child in node.children() {
        assert!(child.children().iter().all(|leaf| leaf.types == TypeSet::NUMERIC));
    }
}

#[test]
fn test_call_overloads() {
    let mut registry = ParameterRegistry::new();
    let len = crate::stdlib::lookup("len").unwrap();
    let mut node = Node::call(len, vec![*parameter(&mut registry, "s")], span());
    node.settle(&mut registry).unwrap();
    assert_eq!(node.value_type(), Some(ValueType::Numeric));
    assert_eq!(
        param_types(&registry, "s"),
        TypeSet::STRING | TypeSet::BYTE_SEQUENCE
    );

    let mut bad = Node::call(len, vec![*constant(1i64)], span());
    match bad.settle(&mut registry) {
        Err(TypeErrorKind::NotLogicallyValid { message, .. }) => {
            assert_eq!(message, "function 'len' cannot be applied to Numeric")
        }
        other => panic!("Expected NotLogicallyValid, got {:?}", other),
    }
}
