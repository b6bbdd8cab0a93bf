use crate::diagnostics::Diagnostic;
use crate::registry::TypeRegistry;
use crate::types::{TypeId, TypeNode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// API group and version. Ordering is by group, then version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    #[must_use]
    pub fn with_kind(&self, kind: impl Into<String>) -> GroupVersionKind {
        GroupVersionKind {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// Identity of a top-level resource type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

/// A discovered API group version with its documented types
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupVersionDetails {
    #[serde(flatten)]
    pub group_version: GroupVersion,
    pub doc: String,
    /// Names of the root kinds
    pub kinds: Vec<String>,
    /// Declared type name → node
    pub types: BTreeMap<String, TypeId>,
}

impl GroupVersionDetails {
    #[must_use]
    pub fn group_version_string(&self) -> String {
        self.group_version.to_string()
    }

    #[must_use]
    pub fn type_for_kind(&self, kind: &str) -> Option<TypeId> {
        self.types.get(kind).copied()
    }

    #[must_use]
    pub fn sorted_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.kinds.iter().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

/// Final, read-only result handed to renderers
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiModel {
    pub types: TypeRegistry,
    /// Sorted by group, then version
    pub groups: Vec<GroupVersionDetails>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ApiModel {
    /// Types of a group version ordered by name
    #[must_use]
    pub fn sorted_types(&self, details: &GroupVersionDetails) -> Vec<(TypeId, &TypeNode)> {
        let mut types: Vec<(TypeId, &TypeNode)> = details
            .types
            .values()
            .filter_map(|&id| self.types.get(id).map(|node| (id, node)))
            .collect();
        types.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        types
    }

    #[must_use]
    pub fn node(&self, id: TypeId) -> Option<&TypeNode> {
        self.types.get(id)
    }
}
