//! Field type definitions.
//!
//! This module contains the closed set of field types the IR understands:
//! fixed-width primitives, references to other models, and the two
//! cardinality wrappers (optional and list).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive value kinds.
///
/// Integer kinds always carry an explicit width and signedness; a width-less
/// integer is resolved by the front end before it reaches the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// 32-bit IEEE 754 float.
    F32,
    /// 64-bit IEEE 754 float.
    F64,
    /// UTF-8 text.
    String,
    /// Opaque byte string.
    Bytes,
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::String,
        Self::Bytes,
    ];

    /// Returns the IR spelling of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Parses a kind from its IR spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns true for the fixed-width integer kinds.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }

    /// Returns true for the floating point kinds.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns the width in bits for numeric kinds.
    #[must_use]
    pub const fn bits(self) -> Option<u32> {
        match self {
            Self::I8 | Self::U8 => Some(8),
            Self::I16 | Self::U16 => Some(16),
            Self::I32 | Self::U32 | Self::F32 => Some(32),
            Self::I64 | Self::U64 | Self::F64 => Some(64),
            Self::Bool | Self::String | Self::Bytes => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type of a model field.
///
/// `Optional` and `List` nest arbitrarily; every chain ends in a
/// `Primitive` or a `Reference`, so a field type names at most one model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A primitive value.
    Primitive(PrimitiveKind),
    /// Another model, by name.
    Reference(String),
    /// A value that may be absent.
    Optional(Box<FieldType>),
    /// Zero or more values, order preserved.
    List(Box<FieldType>),
}

impl FieldType {
    /// Creates a primitive field type.
    #[must_use]
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }

    /// Creates a reference to the named model.
    #[must_use]
    pub fn reference(model: impl Into<String>) -> Self {
        Self::Reference(model.into())
    }

    /// Wraps `inner` as optional.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Wraps `inner` as a list.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Returns true if the outermost wrapper is `Optional`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Returns true if the outermost wrapper is `List`.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns the primitive or reference at the end of the wrapper chain.
    #[must_use]
    pub fn leaf(&self) -> &Self {
        match self {
            Self::Optional(inner) | Self::List(inner) => inner.leaf(),
            leaf => leaf,
        }
    }

    /// Returns the model named by this type, if any.
    #[must_use]
    pub fn referenced_model(&self) -> Option<&str> {
        match self.leaf() {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if the referenced model (if any) sits below a list.
    #[must_use]
    pub fn reference_is_behind_list(&self) -> bool {
        match self {
            Self::List(inner) => inner.referenced_model().is_some(),
            Self::Optional(inner) => inner.reference_is_behind_list(),
            Self::Primitive(_) | Self::Reference(_) => false,
        }
    }

    /// Describes the type structurally, e.g. `Optional(List(string))`.
    ///
    /// Used in diagnostics where the compact expression syntax would be
    /// unfamiliar.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.name().to_string(),
            Self::Reference(name) => format!("Reference({name})"),
            Self::Optional(inner) => format!("Optional({})", inner.describe()),
            Self::List(inner) => format!("List({})", inner.describe()),
        }
    }
}

impl From<PrimitiveKind> for FieldType {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

/// Prints the compact expression form accepted by [`FieldType::from_str`]:
/// `[T]` for lists and a trailing `?` for optionals.
impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Reference(name) => f.write_str(name),
            Self::Optional(inner) => write!(f, "{inner}?"),
            Self::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

impl FromStr for FieldType {
    type Err = crate::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_type_expr(s, &crate::parser::ParseOptions::default())
    }
}
