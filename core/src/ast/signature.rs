//! Overload tables for operators.
//!
//! Each operator accepts a fixed list of `(argument types, result type)`
//! tuples. Type determination keeps only the tuples consistent with what is
//! currently known about a node and its operands.

use crate::parser::{BinaryOp, BoolOp, ComparisonOp};
use crate::values::ValueType::{
    self, Boolean as B, ByteSequence as Y, Numeric as N, String as S,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overload {
    pub args: &'static [ValueType],
    pub result: ValueType,
}

impl Overload {
    pub const fn new(args: &'static [ValueType], result: ValueType) -> Self {
        Self { args, result }
    }
}

pub const NEGATE: &[Overload] = &[Overload::new(&[N], N)];

/// `+`: numeric addition, byte concatenation, or string concatenation when
/// either side is a string.
pub const COMBINE: &[Overload] = &[
    Overload::new(&[N, N], N),
    Overload::new(&[Y, Y], Y),
    Overload::new(&[S, S], S),
    Overload::new(&[S, N], S),
    Overload::new(&[S, B], S),
    Overload::new(&[S, Y], S),
    Overload::new(&[N, S], S),
    Overload::new(&[B, S], S),
    Overload::new(&[Y, S], S),
];

pub const ARITHMETIC: &[Overload] = &[Overload::new(&[N, N], N)];

pub const SHIFT: &[Overload] = &[Overload::new(&[N, N], N), Overload::new(&[Y, N], Y)];

pub const LOGICAL: &[Overload] = &[
    Overload::new(&[B, B], B),
    Overload::new(&[N, N], N),
    Overload::new(&[Y, Y], Y),
];

pub const EQUALITY: &[Overload] = &[
    Overload::new(&[N, N], B),
    Overload::new(&[S, S], B),
    Overload::new(&[B, B], B),
    Overload::new(&[Y, Y], B),
];

pub const ORDERING: &[Overload] = &[
    Overload::new(&[N, N], B),
    Overload::new(&[S, S], B),
    Overload::new(&[Y, Y], B),
];

pub fn arithmetic(op: BinaryOp) -> &'static [Overload] {
    match op {
        BinaryOp::Add => COMBINE,
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow => ARITHMETIC,
    }
}

pub fn logical(_op: BoolOp) -> &'static [Overload] {
    LOGICAL
}

pub fn comparison(op: ComparisonOp) -> &'static [Overload] {
    if op.is_ordering() { ORDERING } else { EQUALITY }
}
