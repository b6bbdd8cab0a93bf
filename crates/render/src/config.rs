use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_KUBERNETES_VERSION: &str = "1.30";

/// The `[render]` table of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Version used in links to the upstream Kubernetes API reference
    pub kubernetes_version: String,
    pub known_types: Vec<KnownType>,
    /// Directory of `*.hbs` templates replacing the built-in ones by name
    pub templates_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            kubernetes_version: DEFAULT_KUBERNETES_VERSION.to_string(),
            known_types: Vec::new(),
            templates_dir: None,
        }
    }
}

/// External type documented elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownType {
    pub name: String,
    pub package: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Everything in one file
    #[default]
    Single,
    /// One file per API group
    Group,
}

impl FromStr for OutputMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "group" => Ok(Self::Group),
            other => Err(RenderError::UnknownOutputMode(other.to_string())),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// Where rendered documents go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub path: PathBuf,
    pub mode: OutputMode,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            mode: OutputMode::Single,
        }
    }
}
