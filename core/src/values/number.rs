use crate::casting::{self, CastError};
use core::cmp::Ordering;
use core::fmt;

/// A numeric value: either a 64-bit integer or a 64-bit float.
///
/// Equality and ordering are numeric, so `Int(2) == Float(2.0)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn is_float(self) -> bool {
        matches!(self, Number::Float(_))
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Integer view of the number; floats must be integral.
    pub fn to_int(self) -> Result<i64, CastError> {
        match self {
            Number::Int(i) => Ok(i),
            Number::Float(f) => casting::float_to_int(f),
        }
    }

    /// Result of a float computation over two integer operands: back to an
    /// integer when the result is exactly integral, float otherwise.
    pub fn from_integral_f64(value: f64) -> Number {
        match casting::float_to_int(value) {
            Ok(i) => Number::Int(i),
            Err(_) => Number::Float(value),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => format_float(f, *x),
        }
    }
}

fn format_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        write!(f, "nan")
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            write!(f, "inf")
        } else {
            write!(f, "-inf")
        }
    } else {
        write!(f, "{}", value)
    }
}
