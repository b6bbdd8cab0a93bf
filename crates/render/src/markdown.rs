use crate::template::{str_list_param, str_param};
use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext};

pub(crate) const TEMPLATES: &[(&str, &str)] = &[
    ("gv_list", include_str!("../templates/markdown/gv_list.hbs")),
    ("gv_details", include_str!("../templates/markdown/gv_details.hbs")),
    ("type", include_str!("../templates/markdown/type.hbs")),
];

pub(crate) fn register_helpers(handlebars: &mut Handlebars<'static>) {
    handlebars.register_helper("render_field_doc", Box::new(field_doc_helper));
    handlebars.register_helper("render_default", Box::new(default_helper));
    handlebars.register_helper("render_validation", Box::new(validation_helper));
}

/// Link to the heading generated for `text`
#[must_use]
pub fn render_local_link(text: &str) -> String {
    let anchor: String = text
        .chars()
        .filter(|c| !matches!(c, '.' | '/' | '(' | ')'))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect::<String>()
        .to_lowercase();
    format!("[{text}](#{anchor})")
}

#[must_use]
pub fn render_external_link(link: &str, text: &str) -> String {
    format!("[{text}]({link})")
}

/// Make free text safe for a table cell
#[must_use]
pub fn render_field_doc(text: &str) -> String {
    text.replace('|', "\\|")
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace('\n', "<br />")
        .replace("<br /><br />", "<br />")
}

#[must_use]
pub fn render_default(text: &str) -> String {
    text.replace('{', "\\{").replace('}', "\\}")
}

#[must_use]
pub fn render_validation(rules: &[&str]) -> String {
    rules
        .iter()
        .map(|rule| render_field_doc(rule))
        .collect::<Vec<_>>()
        .join(" <br />")
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
