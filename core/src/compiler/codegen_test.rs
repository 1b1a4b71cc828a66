use super::*;
use crate::analyzer::analyze;
use crate::ast::Node;
use crate::evaluator::{Argument, ExecutionError, Scope, Tolerance, bind_positional};
use crate::params::{ParameterRegistry, ParameterTable};
use crate::parser::{self, Span};
use crate::syntax::extract_constants;
use crate::values::{Formatters, TypeSet, Value};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Compiled {
    exact: Program,
    tolerant: Program,
    parameters: ParameterTable,
}

fn compile(source: &str) -> Compiled {
    let formatters = Formatters::new();
    let extracted = extract_constants(source, '"', '\\');
    let expr = parser::parse(&extracted.text)
        .unwrap_or_else(|e| panic!("Parse error for {}: {}", source, e));
    let analysis = analyze(
        &expr,
        &extracted,
        source,
        ParameterRegistry::new(),
        &formatters,
    )
    .unwrap_or_else(|e| panic!("Analysis failed for {}: {}", source, e));
    Compiled {
        exact: generate(&analysis.root, Mode::Exact, &formatters, &analysis.parameters).unwrap(),
        tolerant: generate(&analysis.root, Mode::Tolerant, &formatters, &analysis.parameters)
            .unwrap(),
        parameters: analysis.parameters,
    }
}

fn run(
    program: &Program,
    parameters: &ParameterTable,
    tolerance: &Tolerance,
    args: &[Argument],
) -> Result<Value, ExecutionError> {
    let slots = bind_positional(parameters, args).unwrap();
    program.run(&Scope::new(&slots, tolerance))
}

impl Compiled {
    fn run_exact(&self, args: &[Argument]) -> Result<Value, ExecutionError> {
        run(&self.exact, &self.parameters, &Tolerance::EXACT, args)
    }

    fn run_tolerant(&self, tolerance: Tolerance, args: &[Argument]) -> Result<Value, ExecutionError> {
        run(&self.tolerant, &self.parameters, &tolerance, args)
    }
}

#[test]
fn test_modes() {
    let compiled = compile("x + 1");
    assert_eq!(compiled.exact.mode(), Mode::Exact);
    assert_eq!(compiled.tolerant.mode(), Mode::Tolerant);
}

#[test]
fn test_constant_program() {
    let compiled = compile("2 + 3 * 4");
    assert_eq!(compiled.run_exact(&[]), Ok(Value::int(14)));
    assert_eq!(compiled.run_tolerant(Tolerance::proportional(0.5), &[]), Ok(Value::int(14)));
}

#[test]
fn test_parameters_read_their_slots() {
    let compiled = compile("x * 2 + y");
    let result = compiled.run_exact(&[Argument::value(4i64), Argument::value(1i64)]);
    assert_eq!(result, Ok(Value::int(9)));
}

#[test]
fn test_exact_program_ignores_tolerance() {
    let compiled = compile("x = y");
    let args = [Argument::value(1.7), Argument::value(1.9)];
    let loose = Tolerance::absolute(0.2, 0.2);

    assert_eq!(
        run(&compiled.exact, &compiled.parameters, &loose, &args),
        Ok(Value::Bool(false))
    );
    assert_eq!(compiled.run_tolerant(loose, &args), Ok(Value::Bool(true)));
    assert_eq!(
        compiled.run_tolerant(Tolerance::absolute(0.1, 0.1), &args),
        Ok(Value::Bool(false))
    );
}

#[test]
fn test_tolerant_ordering() {
    let compiled = compile("x > y");
    let args = [Argument::value(1i64), Argument::value(1.5)];
    assert_eq!(compiled.run_exact(&args), Ok(Value::Bool(false)));
    assert_eq!(
        compiled.run_tolerant(Tolerance::proportional(0.5), &args),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        compiled.run_tolerant(Tolerance::proportional(0.2), &args),
        Ok(Value::Bool(false))
    );
}

#[test]
fn test_string_comparison_is_never_relaxed() {
    let compiled = compile("s < \"b\"");
    let args = [Argument::value("c")];
    assert_eq!(
        compiled.run_tolerant(Tolerance::proportional(10.0), &args),
        Ok(Value::Bool(false))
    );
}

#[test]
fn test_short_circuit_skips_producers() {
    let compiled = compile("(flag() | boom()) = true");
    let calls = Arc::new(AtomicUsize::new(0));
    let boom = {
        let calls = calls.clone();
        Argument::producer(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Bool(false))
        })
    };

    let result = compiled.run_exact(&[Argument::producer(|| Ok(Value::Bool(true))), boom.clone()]);
    assert_eq!(result, Ok(Value::Bool(true)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let result = compiled.run_exact(&[Argument::producer(|| Ok(Value::Bool(false))), boom]);
    assert_eq!(result, Ok(Value::Bool(false)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_byte_shift_keeps_length() {
    let compiled = compile("(b\"\\x00\" + x) >> 1");
    let result = compiled.run_exact(&[Argument::value(vec![0x01u8, 0x80])]);
    assert_eq!(result, Ok(Value::bytes(vec![0x00, 0x00, 0xc0])));
}

#[test]
fn test_builtin_call() {
    let compiled = compile("sqrt(x)");
    assert_eq!(compiled.run_exact(&[Argument::value(16i64)]), Ok(Value::float(4.0)));
}

#[test]
fn test_runtime_cast_fault() {
    let compiled = compile("n() << 1");
    let result = compiled.run_exact(&[Argument::producer(|| Ok(Value::float(1.5)))]);
    assert!(matches!(result, Err(ExecutionError::InvalidCast(_))));
}

#[test]
fn test_unknown_parameter() {
    let node = Node::parameter("x", false, TypeSet::NUMERIC, Span::new(0, 1));
    let empty = ParameterRegistry::new().finalize().unwrap();
    let err = generate(&node, Mode::Exact, &Formatters::new(), &empty).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnknownParameter {
            name: "x".to_string(),
            span: Span::new(0, 1),
        }
    );
}

#[test]
fn test_unresolved_node() {
    let node = Node::parameter("x", false, TypeSet::all(), Span::new(0, 1));
    let empty = ParameterRegistry::new().finalize().unwrap();
    let err = generate(&node, Mode::Tolerant, &Formatters::new(), &empty).unwrap_err();
    assert_eq!(err, CompileError::Unresolved { span: Span::new(0, 1) });
}
