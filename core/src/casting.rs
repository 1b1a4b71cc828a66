//! Numeric casting between the integer and float representations.
//!
//! A float converts to an integer only when it has no fractional part and
//! fits in an `i64`. Anything else is an invalid cast, raised either while
//! folding constants or while evaluating.

use crate::params::FloatPreference;
use crate::values::Number;

/// Errors that can occur when converting numbers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CastError {
    /// The float has a fractional part (or is NaN/infinite).
    #[error("cannot cast {value} to an integer: value is not integral")]
    NotIntegral { value: f64 },

    /// The float is integral but outside the `i64` range.
    #[error("cannot cast {value} to an integer: value is out of range")]
    OutOfRange { value: f64 },
}

/// Convert a float to an integer, failing unless `floor(x) == x`.
pub fn float_to_int(value: f64) -> Result<i64, CastError> {
    if !value.is_finite() || value.floor() != value {
        return Err(CastError::NotIntegral { value });
    }
    // 2^63 is representable as f64 but not as i64.
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(CastError::OutOfRange { value });
    }
    Ok(value as i64)
}

/// Coerce a number to the representation a parameter prefers.
pub fn coerce(number: Number, preference: FloatPreference) -> Result<Number, CastError> {
    match preference {
        FloatPreference::Unset => Ok(number),
        FloatPreference::Float => Ok(Number::Float(number.as_f64())),
        FloatPreference::Integer => number.to_int().map(Number::Int),
    }
}
