//! String Package
//!
//! Design notes:
//! - `len` counts codepoints for strings and bytes for byte sequences
//! - `upper`/`lower` are ASCII-only
//! - `str` renders any value through the engine's formatter chain, the same
//!   way `+` does when one side is a string

use super::{Builtin, str_arg};
use crate::ast::Overload;
use crate::evaluator::ExecutionError;
use crate::params::FloatPreference;
use crate::values::ValueType::{Boolean as B, ByteSequence as Y, Numeric as N, String as S};
use crate::values::{Formatters, Value};

// ============================================================================
// Inspection Functions
// ============================================================================

/// Length of a string (codepoints) or a byte sequence (bytes)
fn string_len(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    let len = match args.first() {
        Some(Value::Str(s)) => s.chars().count(),
        Some(Value::Bytes(b)) => b.len(),
        _ => {
            return Err(ExecutionError::InvalidArgument {
                function: "len",
                position: 0,
            });
        }
    };
    Ok(Value::int(len as i64))
}

// ============================================================================
// Transformation Functions
// ============================================================================

/// Convert string to uppercase (ASCII-only)
fn string_upper(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    Ok(Value::str(str_arg("upper", args, 0)?.to_ascii_uppercase()))
}

/// Convert string to lowercase (ASCII-only)
fn string_lower(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    Ok(Value::str(str_arg("lower", args, 0)?.to_ascii_lowercase()))
}

/// Trim whitespace, or the characters of the second argument, from both ends
fn string_trim(args: &[Value], _: &Formatters) -> Result<Value, ExecutionError> {
    let s = str_arg("trim", args, 0)?;
    let trimmed = match args.len() {
        1 => s.trim(),
        _ => {
            let chars = str_arg("trim", args, 1)?;
            s.trim_matches(|c| chars.contains(c))
        }
    };
    Ok(Value::str(trimmed))
}

// ============================================================================
// Conversion
// ============================================================================

fn string_str(args: &[Value], formatters: &Formatters) -> Result<Value, ExecutionError> {
    let value = args.first().ok_or(ExecutionError::InvalidArgument {
        function: "str",
        position: 0,
    })?;
    Ok(Value::Str(formatters.format(value)))
}

// ============================================================================
// Table
// ============================================================================

const LEN: &[Overload] = &[Overload::new(&[S], N), Overload::new(&[Y], N)];
const TEXT: &[Overload] = &[Overload::new(&[S], S)];
const TRIM: &[Overload] = &[Overload::new(&[S], S), Overload::new(&[S, S], S)];
const ANY_TO_TEXT: &[Overload] = &[
    Overload::new(&[N], S),
    Overload::new(&[S], S),
    Overload::new(&[B], S),
    Overload::new(&[Y], S),
];

pub static BUILTINS: &[Builtin] = &[
    builtin!("len", LEN, Unset, string_len),
    builtin!("upper", TEXT, Unset, string_upper),
    builtin!("lower", TEXT, Unset, string_lower),
    builtin!("trim", TRIM, Unset, string_trim),
    builtin!("str", ANY_TO_TEXT, Unset, string_str),
];
