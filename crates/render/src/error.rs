use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output path must point to an existing directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to compile {what} regex: {source}")]
    Pattern {
        what: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Unknown renderer: {0}")]
    UnknownRenderer(String),

    #[error("Unknown output mode: {0}")]
    UnknownOutputMode(String),
}
