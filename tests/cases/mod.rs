#![allow(dead_code)]

use std::ops::Range;

use fuzzex::{Argument, Engine, Error, Tolerance, Value, render_error_to_string_no_color};
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;

/// Shared by every case in a test binary, so cases also exercise the cache.
pub static ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

/// Declares a test that compiles `input` with the shared engine.
///
/// With `result`, the expression is evaluated with the given positional
/// `args` (plain values) and optional `tolerance`. With `error`, compilation
/// must fail with the given diagnostic code and, if given, span.
#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        $(args: [$($arg:expr),* $(,)?],)?
        $(tolerance: $tolerance:expr,)?
        result: $result:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let args: Vec<fuzzex::Argument> = vec![$($(fuzzex::Argument::value($arg)),*)?];
            let tolerances: Vec<fuzzex::Tolerance> = vec![$($tolerance)?];
            $crate::cases::check_result(
                $input,
                &args,
                &$crate::cases::tolerance(&tolerances),
                $result,
            );
        }
    };
    (
        name: $name:ident,
        input: $input:expr,
        error: { code: $code:literal $(, span: $span:expr)? $(,)? } $(,)?
    ) => {
        #[test]
        fn $name() {
            let spans: Vec<std::ops::Range<usize>> = vec![$($span)?];
            $crate::cases::check_error($input, $code, spans.into_iter().next());
        }
    };
}

pub fn tolerance(given: &[Tolerance]) -> Tolerance {
    given.first().copied().unwrap_or_default()
}

pub fn check_result(input: &str, args: &[Argument], tolerance: &Tolerance, expected: Value) {
    let expr = ENGINE.interpret(input).unwrap_or_else(|e| {
        panic!(
            "Compilation failed for {}:\n{}",
            input,
            render_error_to_string_no_color(&e)
        )
    });
    let result = expr
        .compute(tolerance, args)
        .unwrap_or_else(|e| panic!("Evaluation failed for {}: {}", input, e));
    assert_eq!(result, expected, "{}", input);
}

pub fn check_error(input: &str, code: &str, span: Option<Range<usize>>) {
    let err = match ENGINE.interpret(input) {
        Ok(expr) => panic!(
            "Expected {} for {}, got an expression of type {}",
            code,
            input,
            expr.return_type()
        ),
        Err(err) => err,
    };
    let Error::Compilation { diagnostics, .. } = &err else {
        panic!("Expected a compilation error for {}, got {:?}", input, err);
    };
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code.as_deref(), Some(code), "{}", input);
    if let Some(span) = span {
        assert_eq!(diagnostic.span.0, span, "{}", input);
    }
}
