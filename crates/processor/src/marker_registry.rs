use crate::config::{CustomMarker, MarkerTarget};
use crate::error::{ProcessorError, Result};
use refdoc_model::MarkerValues;

pub const OBJECT_ROOT_MARKER: &str = "kubebuilder:object:root";
pub const GROUP_NAME_MARKER: &str = "groupName";
pub const VERSION_NAME_MARKER: &str = "versionName";
pub const DEFAULT_MARKER: &str = "kubebuilder:default";
pub const VALIDATION_PREFIX: &str = "kubebuilder:validation:";

#[derive(Debug, Clone, PartialEq, Eq)]
struct MarkerDefinition {
    name: String,
    target: MarkerTarget,
    /// Matches every name starting with `name`
    namespace: bool,
}

impl MarkerDefinition {
    fn exact(name: &str, target: MarkerTarget) -> Self {
        Self {
            name: name.to_string(),
            target,
            namespace: false,
        }
    }

    fn namespace(prefix: &str, target: MarkerTarget) -> Self {
        Self {
            name: prefix.to_string(),
            target,
            namespace: true,
        }
    }

    fn matches(&self, name: &str) -> bool {
        if self.namespace {
            name.starts_with(&self.name)
        } else {
            name == self.name
        }
    }
}

/// Markers collected for packages, types and fields.
///
/// Annotations with no matching definition for their target are dropped
/// before they reach the type graph.
#[derive(Debug, Clone)]
pub struct MarkerRegistry {
    definitions: Vec<MarkerDefinition>,
}

impl MarkerRegistry {
    /// Built-in definitions plus the configured custom markers
    pub fn new(custom: &[CustomMarker]) -> Result<Self> {
        let mut registry = Self::builtin();
        for marker in custom {
            let Some(target) = MarkerTarget::parse(&marker.target) else {
                log::warn!(
                    "Skipping custom marker {} with unknown target type {}",
                    marker.name,
                    marker.target
                );
                continue;
            };
            registry.define(&marker.name, target)?;
        }
        Ok(registry)
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            definitions: vec![
                MarkerDefinition::exact(OBJECT_ROOT_MARKER, MarkerTarget::Type),
                MarkerDefinition::exact(GROUP_NAME_MARKER, MarkerTarget::Package),
                MarkerDefinition::exact(VERSION_NAME_MARKER, MarkerTarget::Package),
                MarkerDefinition::exact(DEFAULT_MARKER, MarkerTarget::Type),
                MarkerDefinition::exact(DEFAULT_MARKER, MarkerTarget::Field),
                MarkerDefinition::namespace(VALIDATION_PREFIX, MarkerTarget::Type),
                MarkerDefinition::namespace(VALIDATION_PREFIX, MarkerTarget::Field),
            ],
        }
    }

    /// Register an exact marker name for `target`
    pub fn define(&mut self, name: &str, target: MarkerTarget) -> Result<()> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ProcessorError::InvalidMarker {
                name: name.to_string(),
                reason: "marker names must be non-empty and contain no whitespace".to_string(),
            });
        }

        if self.is_defined(name, target) {
            return Err(ProcessorError::InvalidMarker {
                name: name.to_string(),
                reason: format!("already defined for {target}"),
            });
        }

        self.definitions.push(MarkerDefinition::exact(name, target));
        Ok(())
    }

    #[must_use]
    pub fn is_defined(&self, name: &str, target: MarkerTarget) -> bool {
        self.definitions
            .iter()
            .any(|def| def.target == target && def.matches(name))
    }

    /// Copy of `markers` restricted to the names defined for `target`
    #[must_use]
    pub fn filter(&self, target: MarkerTarget, markers: &MarkerValues) -> MarkerValues {
        let mut filtered = markers.clone();
        filtered.retain(|name| self.is_defined(name, target));
        filtered
    }
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
