use crate::raw::RawType;
use crate::tag::lookup_tag;
use refdoc_model::MarkerValues;
use serde::{Deserialize, Serialize};

/// Everything the provider knows about one package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Package {
    /// Import path, unique within a source set
    pub path: String,
    pub name: String,
    pub doc: String,
    /// Package-level markers (`groupName`, `versionName`, ...)
    pub markers: MarkerValues,
    pub types: Vec<TypeDecl>,
    pub constants: Vec<ConstDecl>,
}

impl Package {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    #[must_use]
    pub fn with_marker(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.markers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    #[must_use]
    pub fn with_constant(mut self, decl: ConstDecl) -> Self {
        self.constants.push(decl);
        self
    }

    #[must_use]
    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|decl| decl.name == name)
    }

    /// Constants declared with the given type name, in declaration order
    pub fn constants_of<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a ConstDecl> {
        self.constants
            .iter()
            .filter(move |c| c.type_name.as_deref() == Some(type_name))
    }
}

fn default_exported() -> bool {
    true
}

/// A named type declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default = "default_exported")]
    pub exported: bool,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub markers: MarkerValues,
    /// Underlying type expression
    #[serde(default)]
    pub definition: RawType,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, definition: RawType) -> Self {
        Self {
            name: name.into(),
            exported: true,
            doc: String::new(),
            markers: MarkerValues::new(),
            definition,
        }
    }

    pub fn record(name: impl Into<String>, members: Vec<Member>) -> Self {
        Self::new(name, RawType::record(members))
    }

    pub fn alias(name: impl Into<String>, underlying: RawType) -> Self {
        Self::new(name, underlying)
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    #[must_use]
    pub fn with_marker(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.markers.insert(name, value);
        self
    }

    #[must_use]
    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// One member of a record definition. An empty name marks an embedded member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RawType,
    #[serde(default)]
    pub doc: String,
    /// Raw struct tag, `json:"name,omitempty"`
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub markers: MarkerValues,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: RawType) -> Self {
        Self {
            name: name.into(),
            ty,
            doc: String::new(),
            tag: String::new(),
            markers: MarkerValues::new(),
        }
    }

    /// Member declared through composition
    #[must_use]
    pub fn embedded(ty: RawType) -> Self {
        Self::new("", ty)
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Shorthand for a `json:"..."` tag
    #[must_use]
    pub fn with_json(self, value: &str) -> Self {
        self.with_tag(format!("json:\"{value}\""))
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    #[must_use]
    pub fn with_marker(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.markers.insert(name, value);
        self
    }

    /// Value of the `json` key of the tag
    #[must_use]
    pub fn serialization_tag(&self) -> Option<String> {
        lookup_tag(&self.tag, "json")
    }

    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.name.is_empty()
    }
}

/// A constant declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstDecl {
    pub name: String,
    /// Declared type name, unqualified
    pub type_name: Option<String>,
    pub values: Vec<ConstExpr>,
    pub doc: String,
}

impl ConstDecl {
    /// A typed constant with a single literal value
    pub fn literal(
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            values: vec![ConstExpr::Literal(value.into())],
            doc: String::new(),
        }
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// The literal text when the constant has exactly one literal value
    #[must_use]
    pub fn single_literal(&self) -> Option<&str> {
        match self.values.as_slice() {
            [ConstExpr::Literal(text)] => Some(text),
            _ => None,
        }
    }
}

/// Value expression of a constant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstExpr {
    /// Basic literal, quotes included as written
    Literal(String),
    /// Any other expression
    Expr(String),
}
