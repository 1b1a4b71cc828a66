//! Binary and unary operator implementations.
//!
//! Constant folding and generated code both call into this module, so a
//! folded expression always agrees with its evaluated form.

use core::cmp::Ordering;

use crate::{
    evaluator::{ExecutionError, Tolerance},
    parser::{BinaryOp, BoolOp, ComparisonOp, ShiftOp},
    values::{Formatters, Number, Value, bytes},
};

/// Evaluate a numeric binary operation.
///
/// Integer operands stay integers for `+ - *` (wrapping on overflow). Division
/// and power are computed in floating point; the result goes back to an
/// integer only if both operands were integers and it is exactly integral.
pub fn arithmetic(op: BinaryOp, left: Number, right: Number) -> Number {
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => eval_binary_int(op, a, b),
        (a, b) => Number::Float(eval_binary_float(op, a.as_f64(), b.as_f64())),
    }
}

fn eval_binary_int(op: BinaryOp, left: i64, right: i64) -> Number {
    match op {
        BinaryOp::Add => Number::Int(left.wrapping_add(right)),
        BinaryOp::Sub => Number::Int(left.wrapping_sub(right)),
        BinaryOp::Mul => Number::Int(left.wrapping_mul(right)),
        BinaryOp::Div | BinaryOp::Pow => {
            Number::from_integral_f64(eval_binary_float(op, left as f64, right as f64))
        }
    }
}

/// Follows IEEE 754 semantics (produces inf/nan rather than failing).
fn eval_binary_float(op: BinaryOp, left: f64, right: f64) -> f64 {
    match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => left / right,
        BinaryOp::Pow => left.powf(right),
    }
}

/// Any arithmetic operator applied to values. `+` goes through [`combine`].
pub fn binary(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    formatters: &Formatters,
) -> Result<Value, ExecutionError> {
    if op == BinaryOp::Add {
        return combine(left, right, formatters);
    }
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(arithmetic(op, *a, *b))),
        _ => Err(invalid(op.symbol(), left, right)),
    }
}

/// The `+` operator: numeric addition, byte concatenation, or string
/// concatenation when either side is a string.
pub fn combine(
    left: &Value,
    right: &Value,
    formatters: &Formatters,
) -> Result<Value, ExecutionError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            Ok(Value::Number(arithmetic(BinaryOp::Add, *a, *b)))
        }
        (Value::Bytes(a), Value::Bytes(b)) => Ok(Value::Bytes(bytes::concat(a, b))),
        (Value::Str(_), _) | (_, Value::Str(_)) => {
            let mut text = formatters.format(left);
            text.push_str(&formatters.format(right));
            Ok(Value::Str(text))
        }
        _ => Err(invalid("+", left, right)),
    }
}

pub fn negate(value: &Value) -> Result<Value, ExecutionError> {
    match value {
        Value::Number(Number::Int(i)) => Ok(Value::int(i.wrapping_neg())),
        Value::Number(Number::Float(f)) => Ok(Value::float(-f)),
        other => Err(ExecutionError::InvalidOperands {
            op: "-",
            left: other.value_type(),
            right: other.value_type(),
        }),
    }
}

/// `&` and `|` on fully evaluated operands.
///
/// Booleans are combined logically; generated code short-circuits before
/// reaching this point. Numbers must be integral. Byte sequences of unequal
/// length are zero-extended on the right.
pub fn bitwise(op: BoolOp, left: &Value, right: &Value) -> Result<Value, ExecutionError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match op {
            BoolOp::And => *a && *b,
            BoolOp::Or => *a || *b,
        })),
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.to_int()?, b.to_int()?);
            Ok(Value::int(match op {
                BoolOp::And => a & b,
                BoolOp::Or => a | b,
            }))
        }
        (Value::Bytes(a), Value::Bytes(b)) => Ok(Value::Bytes(match op {
            BoolOp::And => bytes::and(a, b),
            BoolOp::Or => bytes::or(a, b),
        })),
        _ => Err(invalid(op.symbol(), left, right)),
    }
}

/// `<<` and `>>`. The amount must be integral; a negative amount shifts the
/// other way.
pub fn shift(op: ShiftOp, left: &Value, right: &Value) -> Result<Value, ExecutionError> {
    let amount = match right {
        Value::Number(n) => n.to_int()?,
        _ => return Err(invalid(op.symbol(), left, right)),
    };
    match left {
        Value::Number(n) => {
            let value = n.to_int()?;
            Ok(Value::int(match op {
                ShiftOp::Left => shift_int_left(value, amount),
                ShiftOp::Right => shift_int_right(value, amount),
            }))
        }
        Value::Bytes(b) => Ok(Value::Bytes(match op {
            ShiftOp::Left => bytes::shift_left(b, amount),
            ShiftOp::Right => bytes::shift_right(b, amount),
        })),
        _ => Err(invalid(op.symbol(), left, right)),
    }
}

fn shift_int_left(value: i64, amount: i64) -> i64 {
    if amount < 0 {
        return shift_int_right(value, amount.saturating_neg());
    }
    u32::try_from(amount)
        .ok()
        .and_then(|n| value.checked_shl(n))
        .unwrap_or(0)
}

/// Arithmetic shift: the sign bit is replicated.
fn shift_int_right(value: i64, amount: i64) -> i64 {
    if amount < 0 {
        return shift_int_left(value, amount.saturating_neg());
    }
    u32::try_from(amount)
        .ok()
        .and_then(|n| value.checked_shr(n))
        .unwrap_or(if value < 0 { -1 } else { 0 })
}

/// Exact comparison.
///
/// Numbers compare numerically across representations; strings and byte
/// sequences lexicographically. Booleans support only `=` and `!=`.
pub fn compare(op: ComparisonOp, left: &Value, right: &Value) -> Result<bool, ExecutionError> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) if !op.is_ordering() => Some(a.cmp(b)),
        _ => return Err(invalid(op.symbol(), left, right)),
    };
    // NaN is unordered: only `!=` holds.
    let Some(ordering) = ordering else {
        return Ok(op == ComparisonOp::Ne);
    };
    Ok(match op {
        ComparisonOp::Eq => ordering == Ordering::Equal,
        ComparisonOp::Ne => ordering != Ordering::Equal,
        ComparisonOp::Gt => ordering == Ordering::Greater,
        ComparisonOp::Ge => ordering != Ordering::Less,
        ComparisonOp::Lt => ordering == Ordering::Less,
        ComparisonOp::Le => ordering != Ordering::Greater,
    })
}

/// Comparison relaxed by `tolerance`. Only numeric operands are affected.
pub fn compare_tolerant(
    op: ComparisonOp,
    left: &Value,
    right: &Value,
    tolerance: &Tolerance,
) -> Result<bool, ExecutionError> {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return compare(op, left, right);
    };
    let (x, y) = (a.as_f64(), b.as_f64());
    Ok(match op {
        ComparisonOp::Eq => tolerance.equal(x, y),
        ComparisonOp::Ne => !tolerance.equal(x, y),
        ComparisonOp::Gt => tolerance.greater(x, y, false),
        ComparisonOp::Ge => tolerance.greater(x, y, true),
        ComparisonOp::Lt => tolerance.less(x, y, false),
        ComparisonOp::Le => tolerance.less(x, y, true),
    })
}

fn invalid(op: &'static str, left: &Value, right: &Value) -> ExecutionError {
    ExecutionError::InvalidOperands {
        op,
        left: left.value_type(),
        right: right.value_type(),
    }
}
