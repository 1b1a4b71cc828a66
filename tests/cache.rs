/*
 * Expression cache shared across threads.
 */

use std::sync::Arc;
use std::thread;

use fuzzex::{Argument, Engine, Value};
use pretty_assertions::assert_eq;

#[test]
fn concurrent_interpret_compiles_once() {
    let engine = Engine::default();
    let expressions: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| engine.interpret("a * b + 1").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(engine.compilations(), 1);
    assert_eq!(engine.len(), 1);
    for expr in &expressions {
        assert!(Arc::ptr_eq(expr, &expressions[0]));
    }
}

#[test]
fn concurrent_evaluation_of_one_expression() {
    let engine = Engine::default();
    let expr = engine.interpret("x * 2").unwrap();
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8i64)
            .map(|i| {
                let expr = Arc::clone(&expr);
                scope.spawn(move || expr.evaluate(&[Argument::value(i)]).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let expected: Vec<_> = (0..8i64).map(|i| Value::int(i * 2)).collect();
    assert_eq!(results, expected);
}

#[test]
fn cache_is_keyed_by_exact_text() {
    let engine = Engine::default();
    engine.interpret("x+1").unwrap();
    engine.interpret("x + 1").unwrap();
    assert_eq!(engine.len(), 2);
    assert_eq!(engine.compilations(), 2);
}

#[test]
fn cleared_expressions_stay_usable() {
    let engine = Engine::default();
    let expr = engine.interpret("x - 1").unwrap();
    engine.clear();
    assert!(engine.is_empty());
    assert_eq!(expr.evaluate(&[Argument::value(3i64)]).unwrap(), Value::int(2));

    let again = engine.interpret("x - 1").unwrap();
    assert!(!Arc::ptr_eq(&expr, &again));
    assert_eq!(engine.compilations(), 2);
}

#[test]
fn failed_compilation_is_retried() {
    let engine = Engine::default();
    assert!(engine.interpret("x +").is_err());
    assert!(!engine.contains("x +"));
    assert!(engine.interpret("x +").is_err());
    assert_eq!(engine.compilations(), 0);
}
