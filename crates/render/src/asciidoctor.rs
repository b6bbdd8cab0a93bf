use crate::template::{str_list_param, str_param};
use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext};

/// Prefix of every generated anchor, declared as a document attribute by
/// the `gv_list` template
pub const ANCHOR_PREFIX: &str = "{anchor_prefix}-";

pub(crate) const TEMPLATES: &[(&str, &str)] = &[
    ("gv_list", include_str!("../templates/asciidoctor/gv_list.hbs")),
    ("gv_details", include_str!("../templates/asciidoctor/gv_details.hbs")),
    ("type", include_str!("../templates/asciidoctor/type.hbs")),
];

pub(crate) fn register_helpers(handlebars: &mut Handlebars<'static>) {
    handlebars.register_helper("render_field_doc", Box::new(field_doc_helper));
    handlebars.register_helper("render_default", Box::new(default_helper));
    handlebars.register_helper("render_validation", Box::new(validation_helper));
}

#[must_use]
pub fn render_local_link(anchor: &str, text: &str) -> String {
    format!("xref:{ANCHOR_PREFIX}{anchor}[$${text}$$]")
}

#[must_use]
pub fn render_external_link(link: &str, text: &str) -> String {
    format!("link:{link}[$${text}$$]")
}

/// Escape the cell separator so doc text cannot break the table
#[must_use]
pub fn render_field_doc(text: &str) -> String {
    text.replace('|', "\\|")
}

#[must_use]
pub fn render_default(text: &str) -> String {
    render_field_doc(text)
}

/// One rule per line, joined with hard line breaks
#[must_use]
pub fn render_validation(rules: &[&str]) -> String {
    rules
        .iter()
        .map(|rule| render_field_doc(rule))
        .collect::<Vec<_>>()
        .join(" +\n")
}

fn field_doc_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&render_field_doc(str_param(h, 0)))?;
    Ok(())
}

fn default_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&render_default(str_param(h, 0)))?;
    Ok(())
}

fn validation_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&render_validation(&str_list_param(h, 0)))?;
    Ok(())
}
