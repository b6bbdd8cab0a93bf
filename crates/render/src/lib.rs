//! # Refdoc Render
//!
//! Renderers turning an assembled [`ApiModel`] into reference documents.
//!
//! ## Output
//!
//! ```text
//! ApiModel
//!     │
//!     ├──> ViewBuilder (links rendered in the output syntax)
//!     │      │
//!     │      ├──> asciidoctor templates  (out.asciidoc, or <group>.asciidoc)
//!     │      └──> markdown templates     (out.md, or <group>.md)
//!     │             ├─ gv_list     package list, one gv_details per group version
//!     │             ├─ gv_details  resource types, one type section per type
//!     │             └─ type        doc, "Appears in", field and enum tables
//!     │
//!     └──> json  (out.json, or <group>.json per API group)
//! ```
//!
//! Templates are handlebars files. A templates directory replaces the
//! built-in templates of the same name. Links to types outside the
//! documented packages point at the upstream Kubernetes API reference or at
//! configured known types.

mod asciidoctor;
mod config;
mod error;
mod functions;
mod json;
mod markdown;
mod output;
mod template;
mod view;

pub use config::{KnownType, OutputMode, OutputOptions, RenderConfig, DEFAULT_KUBERNETES_VERSION};
pub use error::{RenderError, Result};
pub use functions::{basic_type_name, Functions, Link};
pub use json::JsonRenderer;
pub use template::{Format, TemplateRenderer, MAIN_TEMPLATE};
pub use view::{
    should_render_type, DocumentView, FieldView, GroupVersionView, RootKindView, TypeView,
    ViewBuilder,
};

use refdoc_model::ApiModel;

pub trait Renderer {
    fn render(&self, model: &ApiModel) -> Result<()>;
}

/// Create the renderer registered under `name`
pub fn new(name: &str, config: &RenderConfig, output: OutputOptions) -> Result<Box<dyn Renderer>> {
    let format = match name {
        "asciidoctor" => Format::Asciidoctor,
        "markdown" => Format::Markdown,
        "json" => return Ok(Box::new(JsonRenderer::new(output))),
        other => return Err(RenderError::UnknownRenderer(other.to_string())),
    };

    let functions = Functions::new(config.clone())?;
    Ok(Box::new(TemplateRenderer::new(format, functions, output)?))
}
