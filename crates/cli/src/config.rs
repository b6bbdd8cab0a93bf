use anyhow::{Context, Result};
use refdoc_processor::ProcessorConfig;
use refdoc_render::RenderConfig;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "refdoc.toml";

/// Contents of the TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processor: ProcessorConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Read the configuration file. Without an explicit path a missing
    /// `refdoc.toml` yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                log::debug!("No {DEFAULT_CONFIG_PATH} found, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read config {}", path.display()))
            }
        };

        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }
}
