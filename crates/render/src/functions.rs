use crate::config::{KnownType, RenderConfig};
use crate::error::{RenderError, Result};
use refdoc_model::{GroupVersionDetails, TypeId, TypeKind, TypeNode, TypeRegistry};
use regex::Regex;

const KUBE_PACKAGES_PATTERN: &str = r"^k8s\.io/(?:api|apimachinery|apiextensions-apiserver/pkg/apis)/";
const KUBE_DOC_BASE: &str = "https://kubernetes.io/docs/reference/generated/kubernetes-api";

/// Naming and linking helpers shared by every renderer
#[derive(Debug, Clone)]
pub struct Functions {
    config: RenderConfig,
    kube_packages: Regex,
    punctuation: Regex,
}

/// Where a type link points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Anchor inside the rendered document
    Local(String),
    External(String),
}

impl Functions {
    pub fn new(config: RenderConfig) -> Result<Self> {
        let kube_packages = Regex::new(KUBE_PACKAGES_PATTERN).map_err(|source| RenderError::Pattern {
            what: "kube package",
            source,
        })?;
        let punctuation = Regex::new("[[:punct:]]+").map_err(|source| RenderError::Pattern {
            what: "safe ID",
            source,
        })?;

        Ok(Self {
            config,
            kube_packages,
            punctuation,
        })
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Punctuation runs become `-`, the rest is lowercased
    #[must_use]
    pub fn safe_id(&self, id: &str) -> String {
        self.punctuation.replace_all(id, "-").to_lowercase()
    }

    #[must_use]
    pub fn type_id(&self, node: &TypeNode) -> String {
        self.safe_id(&node.identifier())
    }

    #[must_use]
    pub fn group_version_id(&self, details: &GroupVersionDetails) -> String {
        self.safe_id(&details.group_version_string())
    }

    #[must_use]
    pub fn is_kube_type(&self, node: &TypeNode) -> bool {
        self.kube_packages.is_match(&node.package)
    }

    /// Link into the upstream Kubernetes API reference, `None` for types
    /// outside the Kubernetes packages.
    #[must_use]
    pub fn link_for_kube_type(&self, node: &TypeNode) -> Option<String> {
        if !self.is_kube_type(node) {
            return None;
        }

        let mut parts = node.package.rsplit('/');
        let version = parts.next()?.to_lowercase();
        let group = match parts.next()?.to_lowercase().as_str() {
            "apiextensions" => "apiextensions-k8s-io".to_string(),
            "api" => "core".to_string(),
            other => other.to_string(),
        };

        Some(format!(
            "{KUBE_DOC_BASE}/v{}/#{}-{version}-{group}",
            self.config.kubernetes_version,
            node.name.to_lowercase()
        ))
    }

    #[must_use]
    pub fn known_type(&self, node: &TypeNode) -> Option<&KnownType> {
        self.config
            .known_types
            .iter()
            .find(|known| known.package == node.package && known.name == node.name)
    }

    /// Link target of a type, `None` when the type gets plain text.
    ///
    /// Kubernetes and configured known types link out; basic types and
    /// nodes left unresolved have no documentation to point at; everything
    /// else is a local anchor.
    #[must_use]
    pub fn link_for_type(&self, registry: &TypeRegistry, id: TypeId) -> Option<Link> {
        let node = registry.get(id)?;
        if let Some(link) = self.link_for_kube_type(node) {
            return Some(Link::External(link));
        }
        if let Some(known) = self.known_type(node) {
            return Some(Link::External(known.link.clone()));
        }
        if registry.is_basic(id) || matches!(node.kind, TypeKind::Unknown | TypeKind::Unsupported) {
            return None;
        }

        Some(Link::Local(self.type_id(node)))
    }

    /// Display name of a type: its own name, or a schema-style name for
    /// basic types and collections of them.
    #[must_use]
    pub fn simplified_type_name(&self, registry: &TypeRegistry, id: TypeId) -> String {
        let Some(node) = registry.get(id) else {
            return String::new();
        };
        if !registry.is_basic(id) {
            return node.name.clone();
        }

        let element_name = |underlying: TypeId| {
            registry
                .get(underlying)
                .map_or_else(String::new, |elem| basic_type_name(&elem.name).to_string())
        };

        match node.kind {
            TypeKind::Basic => basic_type_name(&node.name).to_string(),
            TypeKind::Pointer { underlying } => element_name(underlying),
            TypeKind::Slice { underlying } | TypeKind::Array { underlying, .. } => {
                format!("{} array", element_name(underlying))
            }
            TypeKind::Map { .. } => "object".to_string(),
            _ => node.name.clone(),
        }
    }
}

/// Schema name of a basic type
#[must_use]
pub fn basic_type_name(name: &str) -> &str {
    match name {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" | "byte" | "rune" => "integer",
        "float32" | "float64" => "float",
        "bool" => "boolean",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn functions(version: &str) -> Functions {
        Functions::new(RenderConfig {
            kubernetes_version: version.into(),
            known_types: vec![KnownType {
                name: "Duration".into(),
                package: "time".into(),
                link: "https://pkg.go.dev/time#Duration".into(),
            }],
            templates_dir: None,
        })
        .unwrap()
    }

    fn basic(registry: &mut TypeRegistry, name: &str) -> TypeId {
        registry
            .get_or_create(name, || TypeNode::new("", name, "").with_kind(TypeKind::Basic))
            .0
    }

    #[test]
    fn kube_links_follow_upstream_anchors() {
        let f = functions("1.29");
        let cases = [
            (
                "k8s.io/apimachinery/pkg/apis/meta/v1",
                "ObjectMeta",
                "https://kubernetes.io/docs/reference/generated/kubernetes-api/v1.29/#objectmeta-v1-meta",
            ),
            (
                "k8s.io/apiextensions-apiserver/pkg/apis/apiextensions/v1",
                "JSON",
                "https://kubernetes.io/docs/reference/generated/kubernetes-api/v1.29/#json-v1-apiextensions-k8s-io",
            ),
            (
                "k8s.io/apimachinery/pkg/api/resource",
                "Quantity",
                "https://kubernetes.io/docs/reference/generated/kubernetes-api/v1.29/#quantity-resource-core",
            ),
        ];

        for (package, name, expected) in cases {
            let node = TypeNode::new("", name, package);
            assert_eq!(f.link_for_kube_type(&node).as_deref(), Some(expected));
        }
        assert_eq!(
            f.link_for_kube_type(&TypeNode::new("", "Widget", "example.com/api/v1")),
            None
        );
    }

    #[test]
    fn safe_id_collapses_punctuation() {
        let f = functions("1.30");
        assert_eq!(f.safe_id("example.com/api/v1.Widget"), "example-com-api-v1-widget");
        assert_eq!(f.safe_id("a..b//C"), "a-b-c");
    }

    #[test]
    fn basic_names_map_to_schema_names() {
        assert_eq!(basic_type_name("int32"), "integer");
        assert_eq!(basic_type_name("rune"), "integer");
        assert_eq!(basic_type_name("float64"), "float");
        assert_eq!(basic_type_name("bool"), "boolean");
        assert_eq!(basic_type_name("string"), "string");
    }

    #[test]
    fn simplified_names_and_links() {
        let f = functions("1.30");
        let mut registry = TypeRegistry::new();
        let int = basic(&mut registry, "int64");
        let string = basic(&mut registry, "string");
        let (ptr, _) = registry.get_or_create("*int64", || {
            TypeNode::new("", "int64", "").with_kind(TypeKind::Pointer { underlying: int })
        });
        let (slice, _) = registry.get_or_create("[]string", || {
            TypeNode::new("", "string", "").with_kind(TypeKind::Slice { underlying: string })
        });
        let map = registry.add_detached(
            TypeNode::new("map[string]string", "map[string]string", "")
                .with_kind(TypeKind::Map { key: string, value: string }),
        );
        let (widget, _) = registry.get_or_create("example.com/v1.Widget", || {
            TypeNode::new("", "Widget", "example.com/v1").with_kind(TypeKind::Record)
        });
        let (duration, _) = registry.get_or_create("time.Duration", || {
            TypeNode::new("", "Duration", "time").with_kind(TypeKind::Alias { underlying: int })
        });
        let stub = registry.add_detached(TypeNode::new("example.com/v1.Gone", "Gone", "example.com/v1"));

        assert_eq!(f.simplified_type_name(&registry, ptr), "integer");
        assert_eq!(f.simplified_type_name(&registry, slice), "string array");
        assert_eq!(f.simplified_type_name(&registry, map), "object");
        assert_eq!(f.simplified_type_name(&registry, widget), "Widget");

        assert_eq!(f.link_for_type(&registry, int), None);
        assert_eq!(f.link_for_type(&registry, stub), None);
        assert_eq!(
            f.link_for_type(&registry, widget),
            Some(Link::Local("example-com-v1-widget".into()))
        );
        assert_eq!(
            f.link_for_type(&registry, duration),
            Some(Link::External("https://pkg.go.dev/time#Duration".into()))
        );
    }
}
