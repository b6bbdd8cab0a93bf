use crate::facts::Member;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw description of a type expression, as reported by the provider.
///
/// `Display` renders the identity key: `pkg.Foo`, `*pkg.Foo`, `[]pkg.Foo`,
/// `[3]pkg.Foo`, `map[string]pkg.Foo`, `string`, `interface{}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawType {
    Basic {
        name: String,
    },
    /// Reference to a declared type
    Named {
        package: String,
        name: String,
    },
    Pointer {
        elem: Box<RawType>,
    },
    Slice {
        elem: Box<RawType>,
    },
    Array {
        len: u64,
        elem: Box<RawType>,
    },
    Map {
        key: Box<RawType>,
        value: Box<RawType>,
    },
    /// Record body, named when it is the definition of a type declaration
    Struct {
        #[serde(default)]
        members: Vec<Member>,
    },
    Interface {
        #[serde(default)]
        methods: Vec<String>,
    },
    /// Nil or unresolvable type expression
    #[default]
    Invalid,
}

impl RawType {
    pub fn basic(name: impl Into<String>) -> Self {
        Self::Basic { name: name.into() }
    }

    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            package: package.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn pointer(elem: Self) -> Self {
        Self::Pointer {
            elem: Box::new(elem),
        }
    }

    #[must_use]
    pub fn slice(elem: Self) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }

    #[must_use]
    pub fn array(len: u64, elem: Self) -> Self {
        Self::Array {
            len,
            elem: Box::new(elem),
        }
    }

    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    #[must_use]
    pub fn record(members: Vec<Member>) -> Self {
        Self::Struct { members }
    }

    #[must_use]
    pub fn empty_interface() -> Self {
        Self::Interface {
            methods: Vec::new(),
        }
    }

    /// Identity key of the type expression
    #[must_use]
    pub fn uid(&self) -> String {
        self.to_string()
    }

    /// Unqualified name with pointer and collection prefixes stripped
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Basic { name } | Self::Named { name, .. } => name.clone(),
            Self::Pointer { elem } | Self::Slice { elem } | Self::Array { elem, .. } => {
                elem.display_name()
            }
            Self::Map { key, value } => {
                format!("map[{}]{}", key.short_form(), value.short_form())
            }
            Self::Struct { .. } | Self::Interface { .. } | Self::Invalid => self.to_string(),
        }
    }

    /// Unqualified form keeping wrapper prefixes
    fn short_form(&self) -> String {
        match self {
            Self::Pointer { elem } => format!("*{}", elem.short_form()),
            Self::Slice { elem } => format!("[]{}", elem.short_form()),
            Self::Array { len, elem } => format!("[{len}]{}", elem.short_form()),
            _ => self.display_name(),
        }
    }

    /// The basic `string` type
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::Basic { name } if name == "string")
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { name } => f.write_str(name),
            Self::Named { package, name } if package.is_empty() => f.write_str(name),
            Self::Named { package, name } => write!(f, "{package}.{name}"),
            Self::Pointer { elem } => write!(f, "*{elem}"),
            Self::Slice { elem } => write!(f, "[]{elem}"),
            Self::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Struct { members } => {
                f.write_str("struct{")?;
                for (idx, member) in members.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("; ")?;
                    }
                    if member.name.is_empty() {
                        write!(f, "{}", member.ty)?;
                    } else {
                        write!(f, "{} {}", member.name, member.ty)?;
                    }
                }
                f.write_str("}")
            }
            Self::Interface { methods } if methods.is_empty() => f.write_str("interface{}"),
            Self::Interface { methods } => write!(f, "interface{{{}}}", methods.join("; ")),
            Self::Invalid => f.write_str("invalid type"),
        }
    }
}
