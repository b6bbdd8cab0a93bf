use crate::types::TypeId;
use serde::Serialize;
use std::fmt;

/// Kind of a type node, with the kind-specific child references.
///
/// Registered named types start out as [`TypeKind::Unknown`] while their
/// definition is still being resolved and receive their final kind once the
/// definition is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    /// Named type whose representation is another single type
    Alias { underlying: TypeId },
    Basic,
    /// Empty interface (any value)
    Interface,
    Map { key: TypeId, value: TypeId },
    Pointer { underlying: TypeId },
    Slice { underlying: TypeId },
    Array { len: u64, underlying: TypeId },
    /// Struct-like type with a member list
    Record,
    #[default]
    Unknown,
    Unsupported,
}

impl TypeKind {
    /// Immediately contained type of aliases, pointers and collections
    #[must_use]
    pub const fn underlying(&self) -> Option<TypeId> {
        match *self {
            Self::Alias { underlying }
            | Self::Pointer { underlying }
            | Self::Slice { underlying }
            | Self::Array { underlying, .. } => Some(underlying),
            _ => None,
        }
    }

    /// Pointer, slice or array
    #[must_use]
    pub const fn is_wrapper(&self) -> bool {
        matches!(
            self,
            Self::Pointer { .. } | Self::Slice { .. } | Self::Array { .. }
        )
    }

    #[must_use]
    pub const fn is_alias(&self) -> bool {
        matches!(self, Self::Alias { .. })
    }

    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alias { .. } => "ALIAS",
            Self::Basic => "BASIC",
            Self::Interface => "INTERFACE",
            Self::Map { .. } => "MAP",
            Self::Pointer { .. } => "POINTER",
            Self::Slice { .. } => "SLICE",
            Self::Array { .. } => "ARRAY",
            Self::Record => "RECORD",
            Self::Unknown => "UNKNOWN",
            Self::Unsupported => "UNSUPPORTED",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
