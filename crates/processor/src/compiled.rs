use crate::config::ProcessorConfig;
use crate::error::{ProcessorError, Result};
use regex::Regex;

/// Exclusion rules compiled once per run
#[derive(Debug, Clone, Default)]
pub struct CompiledConfig {
    ignore_types: Vec<Regex>,
    ignore_fields: Vec<Regex>,
    ignore_group_versions: Vec<Regex>,
    pub use_raw_docstring: bool,
}

impl CompiledConfig {
    pub fn compile(config: &ProcessorConfig) -> Result<Self> {
        Ok(Self {
            ignore_types: compile_all("type", &config.ignore_types)?,
            ignore_fields: compile_all("field", &config.ignore_fields)?,
            ignore_group_versions: compile_all("group-version", &config.ignore_group_versions)?,
            use_raw_docstring: config.use_raw_docstring,
        })
    }

    /// `identifier` is `package.Name`
    #[must_use]
    pub fn should_ignore_type(&self, identifier: &str) -> bool {
        self.ignore_types.iter().any(|re| re.is_match(identifier))
    }

    /// A field named `-` is never serialized and always ignored
    #[must_use]
    pub fn should_ignore_field(&self, type_identifier: &str, field: &str) -> bool {
        if field == "-" {
            return true;
        }

        let qualified = format!("{type_identifier}.{field}");
        self.ignore_fields.iter().any(|re| re.is_match(&qualified))
    }

    #[must_use]
    pub fn should_ignore_group_version(&self, group_version: &str) -> bool {
        self.ignore_group_versions
            .iter()
            .any(|re| re.is_match(group_version))
    }
}

fn compile_all(kind: &'static str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ProcessorError::InvalidPattern {
                kind,
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled() -> CompiledConfig {
        CompiledConfig::compile(&ProcessorConfig {
            ignore_types: vec!["typex$".into()],
            ignore_fields: vec![r"mytype\.Fieldy$".into()],
            ignore_group_versions: vec!["groupz/v1$".into()],
            ..ProcessorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn ignore_type() {
        let cc = compiled();
        assert!(cc.should_ignore_type("mytypex"));
        assert!(!cc.should_ignore_type("typexyz"));
    }

    #[test]
    fn ignore_field() {
        let cc = compiled();
        assert!(cc.should_ignore_field("mytype", "Fieldy"));
        assert!(!cc.should_ignore_field("mytype", "Fieldyz"));
        assert!(cc.should_ignore_field("anything", "-"));
    }

    #[test]
    fn ignore_group_version() {
        let cc = compiled();
        assert!(cc.should_ignore_group_version("groupz/v1"));
        assert!(!cc.should_ignore_group_version("groupz/v1beta1"));
    }

    #[test]
    fn malformed_pattern_names_the_pattern() {
        let err = CompiledConfig::compile(&ProcessorConfig {
            ignore_fields: vec!["(unclosed".into()],
            ..ProcessorConfig::default()
        })
        .unwrap_err();

        match err {
            ProcessorError::InvalidPattern { kind, pattern, .. } => {
                assert_eq!(kind, "field");
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
