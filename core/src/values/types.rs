//! Value kinds and sets of value kinds.
//!
//! Type determination works on [`TypeSet`]s: a node starts with every type it
//! could structurally produce and narrows by intersection until a single type
//! remains.

use bitflags::bitflags;
use core::fmt;

/// One of the four value kinds an expression can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Numeric,
    String,
    Boolean,
    ByteSequence,
}

impl ValueType {
    /// Every value type, in default-resolution order.
    pub const ALL: [ValueType; 4] = [
        ValueType::Numeric,
        ValueType::String,
        ValueType::Boolean,
        ValueType::ByteSequence,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Numeric => "Numeric",
            ValueType::String => "String",
            ValueType::Boolean => "Boolean",
            ValueType::ByteSequence => "ByteSequence",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of value types (the "supportable types" of a node or parameter).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeSet: u8 {
        const NUMERIC = 0b0001;
        const STRING = 0b0010;
        const BOOLEAN = 0b0100;
        const BYTE_SEQUENCE = 0b1000;
    }
}

impl TypeSet {
    /// Returns the type if exactly one is left.
    pub fn single(self) -> Option<ValueType> {
        let mut types = self.types();
        match (types.next(), types.next()) {
            (Some(ty), None) => Some(ty),
            _ => None,
        }
    }

    pub fn has(self, ty: ValueType) -> bool {
        self.contains(TypeSet::from(ty))
    }

    /// Iterate the member types in [`ValueType::ALL`] order.
    pub fn types(self) -> impl Iterator<Item = ValueType> {
        ValueType::ALL.into_iter().filter(move |ty| self.has(*ty))
    }
}

impl From<ValueType> for TypeSet {
    fn from(ty: ValueType) -> Self {
        match ty {
            ValueType::Numeric => TypeSet::NUMERIC,
            ValueType::String => TypeSet::STRING,
            ValueType::Boolean => TypeSet::BOOLEAN,
            ValueType::ByteSequence => TypeSet::BYTE_SEQUENCE,
        }
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, ty) in self.types().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single() {
        assert_eq!(TypeSet::NUMERIC.single(), Some(ValueType::Numeric));
        assert_eq!((TypeSet::NUMERIC | TypeSet::STRING).single(), None);
        assert_eq!(TypeSet::empty().single(), None);
    }

    #[test]
    fn test_types_order() {
        let set = TypeSet::BYTE_SEQUENCE | TypeSet::NUMERIC;
        let types: Vec<_> = set.types().collect();
        assert_eq!(types, vec![ValueType::Numeric, ValueType::ByteSequence]);
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeSet::all().to_string(), "{Numeric, String, Boolean, ByteSequence}");
        assert_eq!(TypeSet::empty().to_string(), "{}");
    }
}
