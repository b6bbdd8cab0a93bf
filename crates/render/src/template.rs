use crate::asciidoctor;
use crate::config::OutputOptions;
use crate::error::{RenderError, Result};
use crate::functions::Functions;
use crate::markdown;
use crate::output::write_documents;
use crate::view::ViewBuilder;
use crate::Renderer;
use handlebars::{Handlebars, Helper};
use refdoc_model::ApiModel;
use std::fmt;
use std::fs;
use std::path::Path;

/// Entry template, rendered once per output document
pub const MAIN_TEMPLATE: &str = "gv_list";

const TEMPLATE_EXTENSION: &str = "hbs";

/// Output syntax of a template renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Markdown,
    Asciidoctor,
}

impl Format {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Asciidoctor => "asciidoc",
        }
    }

    #[must_use]
    pub fn local_link(self, anchor: &str, text: &str) -> String {
        match self {
            Self::Markdown => markdown::render_local_link(text),
            Self::Asciidoctor => asciidoctor::render_local_link(anchor, text),
        }
    }

    #[must_use]
    pub fn external_link(self, link: &str, text: &str) -> String {
        match self {
            Self::Markdown => markdown::render_external_link(link, text),
            Self::Asciidoctor => asciidoctor::render_external_link(link, text),
        }
    }

    fn default_templates(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Markdown => markdown::TEMPLATES,
            Self::Asciidoctor => asciidoctor::TEMPLATES,
        }
    }

    fn register_helpers(self, handlebars: &mut Handlebars<'static>) {
        match self {
            Self::Markdown => markdown::register_helpers(handlebars),
            Self::Asciidoctor => asciidoctor::register_helpers(handlebars),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::Asciidoctor => f.write_str("asciidoctor"),
        }
    }
}

/// Renders the model through handlebars templates.
///
/// The built-in templates of the format are registered first; templates
/// found in the configured templates directory replace them by file stem,
/// so a directory may override only `type.hbs`.
pub struct TemplateRenderer {
    format: Format,
    functions: Functions,
    output: OutputOptions,
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new(format: Format, functions: Functions, output: OutputOptions) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        format.register_helpers(&mut handlebars);

        for (name, source) in format.default_templates() {
            register_template(&mut handlebars, name, source)?;
        }
        if let Some(dir) = &functions.config().templates_dir {
            let loaded = load_templates_dir(&mut handlebars, dir)?;
            log::info!("Loaded {loaded} {format} templates from {}", dir.display());
        }

        Ok(Self {
            format,
            functions,
            output,
            handlebars,
        })
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, model: &ApiModel) -> Result<()> {
        let view = ViewBuilder::new(&self.functions, self.format, model);
        let written = write_documents(&self.output, self.format.extension(), &model.groups, |groups| {
            let document = view.document(groups);
            Ok(self.handlebars.render(MAIN_TEMPLATE, &document)?)
        })?;
        log::debug!("{} renderer wrote {} files", self.format, written.len());
        Ok(())
    }
}

fn register_template(handlebars: &mut Handlebars<'static>, name: &str, source: &str) -> Result<()> {
    handlebars
        .register_template_string(name, source)
        .map_err(|source| RenderError::Template {
            name: name.to_string(),
            source: Box::new(source),
        })
}

/// Register every `*.hbs` file of `dir` under its file stem
fn load_templates_dir(handlebars: &mut Handlebars<'static>, dir: &Path) -> Result<usize> {
    let io_error = |source: std::io::Error| RenderError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(TEMPLATE_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    for path in &paths {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let source = fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loading template {name} from {}", path.display());
        register_template(handlebars, name, &source)?;
    }
    Ok(paths.len())
}

/// First helper parameter as a string, empty when missing
pub(crate) fn str_param<'h>(h: &'h Helper, idx: usize) -> &'h str {
    h.param(idx).and_then(|v| v.value().as_str()).unwrap_or("")
}

/// String items of an array helper parameter
pub(crate) fn str_list_param<'h>(h: &'h Helper, idx: usize) -> Vec<&'h str> {
    h.param(idx)
        .and_then(|v| v.value().as_array())
        .map(|items| items.iter().filter_map(|item| item.as_str()).collect())
        .unwrap_or_default()
}
