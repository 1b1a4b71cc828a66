//! Builtin functions.
//!
//! Every builtin takes one or two arguments and is described by a list of
//! overloads (argument types and result type) used during type
//! determination, plus a native implementation called at fold time and at
//! run time.
//!
//! - Math: abs, sqrt, exp, ln, log10, log, floor, ceil, round, pow, min,
//!   max, sin, cos, tan, asin, acos, atan, atan2
//! - String: len, upper, lower, trim, str

use core::fmt;

use hashbrown::HashMap;
use lazy_static::lazy_static;

use crate::ast::Overload;
use crate::evaluator::ExecutionError;
use crate::params::FloatPreference;
use crate::values::{Formatters, Number, Value};

macro_rules! builtin {
    ($name:literal, $overloads:expr, $preference:ident, $eval:expr) => {
        Builtin {
            name: $name,
            overloads: $overloads,
            preference: FloatPreference::$preference,
            eval: $eval,
        }
    };
}

pub mod math;
pub mod string;

/// Native implementation of a builtin.
pub type NativeFn = fn(&[Value], &Formatters) -> Result<Value, ExecutionError>;

pub struct Builtin {
    pub name: &'static str,
    pub overloads: &'static [Overload],
    /// Representation wanted for numeric parameters passed directly.
    pub preference: FloatPreference,
    pub eval: NativeFn,
}

impl Builtin {
    pub fn accepts_arity(&self, arity: usize) -> bool {
        self.overloads.iter().any(|o| o.args.len() == arity)
    }

    /// Accepted argument counts, for error messages (e.g. "1 or 2").
    pub fn arity_description(&self) -> String {
        let mut arities: Vec<usize> = self.overloads.iter().map(|o| o.args.len()).collect();
        arities.sort_unstable();
        arities.dedup();
        arities
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" or ")
    }

    pub fn call(&self, args: &[Value], formatters: &Formatters) -> Result<Value, ExecutionError> {
        (self.eval)(args, formatters)
    }
}

// Builtins are identified by name.
impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, &'static Builtin> = math::BUILTINS
        .iter()
        .chain(string::BUILTINS.iter())
        .map(|builtin| (builtin.name, builtin))
        .collect();
}

/// Find a builtin by name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name).copied()
}

/// Every builtin, sorted by name.
pub fn builtins() -> Vec<&'static Builtin> {
    let mut all: Vec<_> = BUILTINS.values().copied().collect();
    all.sort_by_key(|builtin| builtin.name);
    all
}

fn number_arg(function: &'static str, args: &[Value], position: usize) -> Result<Number, ExecutionError> {
    args.get(position)
        .and_then(Value::as_number)
        .ok_or(ExecutionError::InvalidArgument { function, position })
}

fn str_arg<'a>(
    function: &'static str,
    args: &'a [Value],
    position: usize,
) -> Result<&'a str, ExecutionError> {
    args.get(position)
        .and_then(Value::as_str)
        .ok_or(ExecutionError::InvalidArgument { function, position })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("sqrt").map(|b| b.name), Some("sqrt"));
        assert!(lookup("Sqrt").is_none());
        assert!(lookup("now").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(
            builtins().len(),
            math::BUILTINS.len() + string::BUILTINS.len()
        );
    }

    #[test]
    fn test_arity() {
        let trim = lookup("trim").unwrap();
        assert!(trim.accepts_arity(1));
        assert!(trim.accepts_arity(2));
        assert!(!trim.accepts_arity(0));
        assert_eq!(trim.arity_description(), "1 or 2");
        assert_eq!(lookup("atan2").unwrap().arity_description(), "2");
    }

    #[test]
    fn test_every_builtin_takes_one_or_two_arguments() {
        for builtin in builtins() {
            for overload in builtin.overloads {
                assert!(
                    (1..=2).contains(&overload.args.len()),
                    "{} has an overload with {} arguments",
                    builtin.name,
                    overload.args.len()
                );
            }
        }
    }
}
