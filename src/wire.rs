//! Wire representations and the field type resolver.

use crate::schema::DeclaredType;

/// A fixed-width integer wider than one byte, encoded little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedInt {
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
}

impl FixedInt {
    /// Encoded width in bytes.
    pub fn width(self) -> usize {
        match self {
            FixedInt::U16 | FixedInt::I16 => 2,
            FixedInt::U32 | FixedInt::I32 => 4,
            FixedInt::U64 | FixedInt::I64 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, FixedInt::I16 | FixedInt::I32 | FixedInt::I64)
    }
}

/// The integer representation an enumeration is carried as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumRepr {
    Byte,
    SByte,
    Fixed(FixedInt),
}

/// The binary representation family a field is encoded as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// u16 little-endian byte-length prefix followed by UTF-8 bytes.
    String,
    /// Exactly one byte.
    Byte,
    /// One byte, reinterpreted signed.
    SByte,
    /// `width()` bytes, little-endian.
    Fixed(FixedInt),
    /// Encoded exactly as the underlying representation, then reinterpreted
    /// as the enumeration's bit pattern. Out-of-range tags are accepted.
    Enum(EnumRepr),
}

/// Map a declared field type to its wire representation.
///
/// The mapping is exhaustive with no fallback: anything outside the closed
/// set returns `None` and the caller diagnoses an unsupported field type.
/// Enum recursion depth is exactly one; an enum whose underlying type is not
/// an integer does not resolve.
pub fn resolve(declared: &DeclaredType) -> Option<WireKind> {
    match declared {
        DeclaredType::Text => Some(WireKind::String),
        DeclaredType::UInt8 => Some(WireKind::Byte),
        DeclaredType::Int8 => Some(WireKind::SByte),
        DeclaredType::UInt16 => Some(WireKind::Fixed(FixedInt::U16)),
        DeclaredType::Int16 => Some(WireKind::Fixed(FixedInt::I16)),
        DeclaredType::UInt32 => Some(WireKind::Fixed(FixedInt::U32)),
        DeclaredType::Int32 => Some(WireKind::Fixed(FixedInt::I32)),
        DeclaredType::UInt64 => Some(WireKind::Fixed(FixedInt::U64)),
        DeclaredType::Int64 => Some(WireKind::Fixed(FixedInt::I64)),
        DeclaredType::Enum { underlying, .. } => match resolve(underlying)? {
            WireKind::Byte => Some(WireKind::Enum(EnumRepr::Byte)),
            WireKind::SByte => Some(WireKind::Enum(EnumRepr::SByte)),
            WireKind::Fixed(int) => Some(WireKind::Enum(EnumRepr::Fixed(int))),
            _ => None,
        },
        DeclaredType::Named(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_scalars() {
        assert_eq!(resolve(&DeclaredType::Text), Some(WireKind::String));
        assert_eq!(resolve(&DeclaredType::UInt8), Some(WireKind::Byte));
        assert_eq!(resolve(&DeclaredType::Int8), Some(WireKind::SByte));
        assert_eq!(
            resolve(&DeclaredType::Int64),
            Some(WireKind::Fixed(FixedInt::I64))
        );
    }

    #[test]
    fn resolves_enum_over_integer() {
        let declared = DeclaredType::Enum {
            name: "Color".to_string(),
            underlying: Box::new(DeclaredType::UInt8),
        };
        assert_eq!(resolve(&declared), Some(WireKind::Enum(EnumRepr::Byte)));

        let wide = DeclaredType::Enum {
            name: "Flags".to_string(),
            underlying: Box::new(DeclaredType::UInt32),
        };
        assert_eq!(
            resolve(&wide),
            Some(WireKind::Enum(EnumRepr::Fixed(FixedInt::U32)))
        );
    }

    #[test]
    fn rejects_unknown_and_text_backed_enums() {
        assert_eq!(resolve(&DeclaredType::Named("Guid".to_string())), None);
        let bad = DeclaredType::Enum {
            name: "Weird".to_string(),
            underlying: Box::new(DeclaredType::Text),
        };
        assert_eq!(resolve(&bad), None);
    }

    #[test]
    fn fixed_widths() {
        assert_eq!(FixedInt::U16.width(), 2);
        assert_eq!(FixedInt::I32.width(), 4);
        assert_eq!(FixedInt::U64.width(), 8);
        assert!(FixedInt::I16.is_signed());
        assert!(!FixedInt::U32.is_signed());
    }
}
