//! Source-level types and literal values.
//!
//! [`TypeKind`] tags are ordered: the signed/float ladder `I8..F64` comes
//! first, then the unsigned ladder `U8..U64`, then the non-numeric tags.
//! The semantic analyzer's common-type relation leans on this layout, so
//! the discriminants are explicit and must not be reordered.

use std::fmt;

use blinkc_lex::TokenKind;

/// Type tag. Discriminant order is load-bearing (see module docs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TypeKind {
    I8 = 0,
    I16 = 1,
    I32 = 2,
    I64 = 3,
    F32 = 4,
    F64 = 5,
    U8 = 6,
    U16 = 7,
    U32 = 8,
    U64 = 9,
    Bool = 10,
    Str = 11,
    Nothing = 12,
    Class = 13,
    Enum = 14,
}

impl TypeKind {
    /// Numeric ordering tag.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Whether the tag is one of the unsigned integer kinds.
    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            TypeKind::U8 | TypeKind::U16 | TypeKind::U32 | TypeKind::U64
        )
    }

    /// Maps a primitive type keyword token to its tag.
    pub fn from_token(kind: TokenKind) -> Option<TypeKind> {
        let mapped = match kind {
            TokenKind::I8 => TypeKind::I8,
            TokenKind::I16 => TypeKind::I16,
            TokenKind::I32 => TypeKind::I32,
            TokenKind::I64 => TypeKind::I64,
            TokenKind::F32 => TypeKind::F32,
            TokenKind::F64 => TypeKind::F64,
            TokenKind::U8 => TypeKind::U8,
            TokenKind::U16 => TypeKind::U16,
            TokenKind::U32 => TypeKind::U32,
            TokenKind::U64 => TypeKind::U64,
            TokenKind::Bool => TypeKind::Bool,
            TokenKind::Nothing => TypeKind::Nothing,
            _ => return None,
        };
        Some(mapped)
    }
}

/// A source-level type: tag, textual name, and the three flags.
///
/// Equality is structural over every field. `is_unsigned` is redundant
/// with the tag for the builtin integers but is kept for diagnostic
/// rendering and uniform flag handling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Type {
    pub kind: TypeKind,
    pub name: String,
    pub is_const: bool,
    pub is_unsigned: bool,
    pub is_pointer: bool,
}

impl Type {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            is_const: false,
            is_unsigned: kind.is_unsigned_int(),
            is_pointer: false,
        }
    }

    pub fn with_flags(
        kind: TypeKind,
        name: impl Into<String>,
        is_const: bool,
        is_pointer: bool,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            is_const,
            is_unsigned: kind.is_unsigned_int(),
            is_pointer,
        }
    }

    pub fn i8() -> Self {
        Self::new(TypeKind::I8, "i8")
    }

    pub fn i16() -> Self {
        Self::new(TypeKind::I16, "i16")
    }

    pub fn i32() -> Self {
        Self::new(TypeKind::I32, "i32")
    }

    pub fn i64() -> Self {
        Self::new(TypeKind::I64, "i64")
    }

    pub fn f32() -> Self {
        Self::new(TypeKind::F32, "f32")
    }

    pub fn f64() -> Self {
        Self::new(TypeKind::F64, "f64")
    }

    pub fn u8() -> Self {
        Self::new(TypeKind::U8, "u8")
    }

    pub fn u16() -> Self {
        Self::new(TypeKind::U16, "u16")
    }

    pub fn u32() -> Self {
        Self::new(TypeKind::U32, "u32")
    }

    pub fn u64() -> Self {
        Self::new(TypeKind::U64, "u64")
    }

    pub fn bool_type() -> Self {
        Self::new(TypeKind::Bool, "bool")
    }

    pub fn string() -> Self {
        Self::new(TypeKind::Str, "string")
    }

    pub fn nothing() -> Self {
        Self::new(TypeKind::Nothing, "nothing")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.kind {
            TypeKind::Class => format!("class <{}>", self.name),
            TypeKind::Enum => format!("enum <{}>", self.name),
            _ => self.name.clone(),
        };
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", base)?;
        if self.is_pointer {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// A concrete literal payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Bool(bool),
    Str(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_order() {
        assert!(TypeKind::I8.tag() < TypeKind::F64.tag());
        assert_eq!(TypeKind::F64.tag(), 5);
        assert_eq!(TypeKind::U8.tag(), 6);
        assert_eq!(TypeKind::Str.tag(), 11);
        assert_eq!(TypeKind::Enum.tag(), 14);
    }

    #[test]
    fn test_unsigned_detection() {
        assert!(TypeKind::U32.is_unsigned_int());
        assert!(!TypeKind::I32.is_unsigned_int());
        assert!(Type::u8().is_unsigned);
        assert!(!Type::f32().is_unsigned);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Type::i32(), Type::i32());
        let mut pointer = Type::i32();
        pointer.is_pointer = true;
        assert_ne!(Type::i32(), pointer);
        let mut constant = Type::i32();
        constant.is_const = true;
        assert_ne!(Type::i32(), constant);
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::i32().to_string(), "i32");
        let mut t = Type::with_flags(TypeKind::U8, "u8", true, true);
        assert_eq!(t.to_string(), "const u8*");
        t.is_const = false;
        assert_eq!(t.to_string(), "u8*");
        assert_eq!(Type::new(TypeKind::Class, "Point").to_string(), "class <Point>");
    }

    #[test]
    fn test_from_token() {
        assert_eq!(TypeKind::from_token(TokenKind::Nothing), Some(TypeKind::Nothing));
        assert_eq!(TypeKind::from_token(TokenKind::U64), Some(TypeKind::U64));
        assert_eq!(TypeKind::from_token(TokenKind::Id), None);
    }
}
