use crate::config::OutputOptions;
use crate::error::Result;
use crate::output::write_documents;
use crate::Renderer;
use refdoc_model::{ApiModel, Diagnostic, GroupVersionDetails, TypeRegistry};
use serde::Serialize;

/// Machine-readable dump of the assembled model.
///
/// `types` is the whole registry arena; every `TypeId` in the document is an
/// index into it.
#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    groups: &'a [&'a GroupVersionDetails],
    types: &'a TypeRegistry,
    diagnostics: &'a [Diagnostic],
}

pub struct JsonRenderer {
    output: OutputOptions,
}

impl JsonRenderer {
    #[must_use]
    pub fn new(output: OutputOptions) -> Self {
        Self { output }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, model: &ApiModel) -> Result<()> {
        write_documents(&self.output, "json", &model.groups, |groups| {
            let document = JsonDocument {
                groups,
                types: &model.types,
                diagnostics: &model.diagnostics,
            };
            Ok(serde_json::to_string_pretty(&document)?)
        })?;
        Ok(())
    }
}
