//! Math Package
//!
//! Functions: abs, min, max, floor, ceil, round, pow, sqrt, exp, ln, log10,
//!            log, sin, cos, tan, asin, acos, atan, atan2
//!
//! Transcendental functions always compute in floating point. `abs`,
//! `floor`, `ceil`, `round`, `min` and `max` keep integers as integers.

use super::{Builtin, number_arg};
use crate::ast::Overload;
use crate::evaluator::{ExecutionError, operators};
use crate::params::FloatPreference;
use crate::parser::BinaryOp;
use crate::values::ValueType::Numeric as N;
use crate::values::{Formatters, Number, Value};

const UNARY: &[Overload] = &[Overload::new(&[N], N)];
const BINARY: &[Overload] = &[Overload::new(&[N, N], N)];

// ============================================================================
// Basic Operations
// ============================================================================

/// Absolute value (integers wrap at `i64::MIN`)
fn math_abs(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    Ok(match number_arg("abs", args, 0)? {
        Number::Int(i) => Value::int(i.wrapping_abs()),
        Number::Float(f) => Value::float(f.abs()),
    })
}

/// Smaller of two numbers, in the representation it was given
fn math_min(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    let a = number_arg("min", args, 0)?;
    let b = number_arg("min", args, 1)?;
    Ok(Value::Number(if b < a { b } else { a }))
}

/// Larger of two numbers, in the representation it was given
fn math_max(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    let a = number_arg("max", args, 0)?;
    let b = number_arg("max", args, 1)?;
    Ok(Value::Number(if b > a { b } else { a }))
}

fn math_pow(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    let base = number_arg("pow", args, 0)?;
    let exponent = number_arg("pow", args, 1)?;
    Ok(Value::Number(operators::arithmetic(
        BinaryOp::Pow,
        base,
        exponent,
    )))
}

// ============================================================================
// Rounding
// ============================================================================

/// Round with `f`; the result is an integer whenever it fits one.
fn rounding(function: &'static str, args: &[Value], f: fn(f64) -> f64) -> Result<Value, ExecutionError> {
    Ok(match number_arg(function, args, 0)? {
        Number::Int(i) => Value::int(i),
        Number::Float(x) => Value::Number(Number::from_integral_f64(f(x))),
    })
}

fn math_floor(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    rounding("floor", args, f64::floor)
}

fn math_ceil(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    rounding("ceil", args, f64::ceil)
}

/// Round half away from zero
fn math_round(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    rounding("round", args, f64::round)
}

// ============================================================================
// Floating point functions
// ============================================================================

macro_rules! float_fns {
    ($($fn_name:ident => $name:literal, |$x:ident| $body:expr;)*) => {
        $(
            fn $fn_name(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
                let $x = number_arg($name, args, 0)?.as_f64();
                Ok(Value::float($body))
            }
        )*
    };
}

float_fns! {
    math_sqrt => "sqrt", |x| x.sqrt();
    math_exp => "exp", |x| x.exp();
    math_ln => "ln", |x| x.ln();
    math_log10 => "log10", |x| x.log10();
    math_sin => "sin", |x| x.sin();
    math_cos => "cos", |x| x.cos();
    math_tan => "tan", |x| x.tan();
    math_asin => "asin", |x| x.asin();
    math_acos => "acos", |x| x.acos();
    math_atan => "atan", |x| x.atan();
}

/// Logarithm of `value` in the given `base`
fn math_log(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    let base = number_arg("log", args, 0)?.as_f64();
    let value = number_arg("log", args, 1)?.as_f64();
    Ok(Value::float(value.ln() / base.ln()))
}

/// Four-quadrant arctangent of `y / x`
fn math_atan2(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    let y = number_arg("atan2", args, 0)?.as_f64();
    let x = number_arg("atan2", args, 1)?.as_f64();
    Ok(Value::float(y.atan2(x)))
}

// ============================================================================
// Table
// ============================================================================

pub static BUILTINS: &[Builtin] = &[
    builtin!("abs", UNARY, Unset, math_abs),
    builtin!("min", BINARY, Unset, math_min),
    builtin!("max", BINARY, Unset, math_max),
    builtin!("pow", BINARY, Unset, math_pow),
    builtin!("floor", UNARY, Unset, math_floor),
    builtin!("ceil", UNARY, Unset, math_ceil),
    builtin!("round", UNARY, Unset, math_round),
    builtin!("sqrt", UNARY, Float, math_sqrt),
    builtin!("exp", UNARY, Float, math_exp),
    builtin!("ln", UNARY, Float, math_ln),
    builtin!("log10", UNARY, Float, math_log10),
    builtin!("log", BINARY, Float, math_log),
    builtin!("sin", UNARY, Float, math_sin),
    builtin!("cos", UNARY, Float, math_cos),
    builtin!("tan", UNARY, Float, math_tan),
    builtin!("asin", UNARY, Float, math_asin),
    builtin!("acos", UNARY, Float, math_acos),
    builtin!("atan", UNARY, Float, math_atan),
    builtin!("atan2", BINARY, Float, math_atan2),
];
