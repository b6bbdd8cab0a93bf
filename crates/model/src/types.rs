use crate::group_version::GroupVersionKind;
use crate::kind::TypeKind;
use crate::markers::MarkerValues;
use serde::Serialize;
use std::fmt;

/// Index of a node in the [`TypeRegistry`](crate::TypeRegistry) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeId(usize);

impl TypeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A declared or structurally derived type
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeNode {
    /// Identity key (`pkg.Foo`, `*pkg.Foo`, `[]pkg.Foo`, `string`, ...)
    pub uid: String,
    pub name: String,
    /// Declaring package path, empty for basic types
    pub package: String,
    pub doc: String,
    #[serde(flatten)]
    pub kind: TypeKind,
    /// Members, set for records only
    pub fields: Vec<Field>,
    /// Types whose structure contains this type
    pub references: Vec<TypeId>,
    #[serde(skip_serializing_if = "MarkerValues::is_empty")]
    pub markers: MarkerValues,
    pub default: String,
    pub validation: Vec<String>,
    pub enum_values: Vec<EnumValue>,
    pub root_kind: Option<GroupVersionKind>,
}

impl TypeNode {
    pub fn new(uid: impl Into<String>, name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            package: package.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Non-unique identifier disregarding pointer/collection wrapping:
    /// `pkg.Foo` for both `*pkg.Foo` and `pkg.Foo`. Use `uid` for identity.
    #[must_use]
    pub fn identifier(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.root_kind.is_some()
    }
}

/// One member of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Serialization name, possibly overridden by a directive
    pub name: String,
    pub doc: String,
    /// Declared through language-level composition
    pub embedded: bool,
    /// Serialized flattened into the enclosing record
    pub inlined: bool,
    #[serde(rename = "type")]
    pub type_ref: TypeId,
    #[serde(skip_serializing_if = "MarkerValues::is_empty")]
    pub markers: MarkerValues,
    pub default: String,
    pub validation: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, type_ref: TypeId) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            embedded: false,
            inlined: false,
            type_ref,
            markers: MarkerValues::new(),
            default: String::new(),
            validation: Vec::new(),
        }
    }
}

/// Named constant value of a string-based alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub doc: String,
}
