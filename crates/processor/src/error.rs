use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessorError>;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Failed to compile {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid marker definition '{name}': {reason}")]
    InvalidMarker { name: String, reason: String },

    #[error("Source error: {0}")]
    Source(#[from] refdoc_source::SourceError),

    #[error("Type not loaded: {0}")]
    TypeNotLoaded(String),
}
