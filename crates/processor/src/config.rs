use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_MAX_INLINE_ITERATIONS: usize = 100;

/// Settings of one processing run, the `[processor]` table of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Nesting depth past which types are left unexpanded
    pub max_depth: usize,
    /// Ceiling of the inlining fixed-point loop
    pub max_inline_iterations: usize,
    /// Patterns matched against `package.Name`
    pub ignore_types: Vec<String>,
    /// Patterns matched against `package.Type.field`
    pub ignore_fields: Vec<String>,
    /// Patterns matched against `group/version`
    pub ignore_group_versions: Vec<String>,
    /// Keep documentation text as written instead of reflowing paragraphs
    pub use_raw_docstring: bool,
    pub custom_markers: Vec<CustomMarker>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_inline_iterations: DEFAULT_MAX_INLINE_ITERATIONS,
            ignore_types: Vec::new(),
            ignore_fields: Vec::new(),
            ignore_group_versions: Vec::new(),
            use_raw_docstring: false,
            custom_markers: Vec::new(),
        }
    }
}

/// Additional marker to collect, declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMarker {
    pub name: String,
    /// `package`, `type` or `field`; anything else is skipped with a warning
    pub target: String,
}

impl CustomMarker {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

/// What a marker can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerTarget {
    Package,
    Type,
    Field,
}

impl MarkerTarget {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "package" => Some(Self::Package),
            "type" => Some(Self::Type),
            "field" => Some(Self::Field),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Type => "type",
            Self::Field => "field",
        }
    }
}

impl fmt::Display for MarkerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_target_parses_known_names_only() {
        assert_eq!(MarkerTarget::parse("package"), Some(MarkerTarget::Package));
        assert_eq!(MarkerTarget::parse("field"), Some(MarkerTarget::Field));
        assert_eq!(MarkerTarget::parse("Type"), None);
        assert_eq!(MarkerTarget::Type.to_string(), "type");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ProcessorConfig =
            serde_json::from_str(r#"{"ignore_types": ["List$"]}"#).unwrap();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_inline_iterations, DEFAULT_MAX_INLINE_ITERATIONS);
        assert_eq!(config.ignore_types, vec!["List$".to_string()]);
        assert!(!config.use_raw_docstring);
    }
}
