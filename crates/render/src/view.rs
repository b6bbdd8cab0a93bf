use crate::functions::{Functions, Link};
use crate::template::Format;
use refdoc_model::{
    display_value, ApiModel, EnumValue, Field, GroupVersionDetails, MarkerValues, TypeId, TypeKind,
    TypeNode,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Data handed to the `gv_list` template
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub groups: Vec<GroupVersionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupVersionView {
    pub group: String,
    pub version: String,
    pub group_version: String,
    /// Anchor of the group version section
    pub id: String,
    pub link: String,
    pub doc: String,
    /// Links to the root kinds, sorted by kind
    pub kinds: Vec<String>,
    /// Types getting a section, sorted by name
    pub types: Vec<TypeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeView {
    pub name: String,
    pub package: String,
    pub id: String,
    pub doc: String,
    /// Link to the aliased type
    pub underlying: Option<String>,
    pub validation: Vec<String>,
    /// Links to the referencing types
    pub references: Vec<String>,
    pub root_kind: Option<RootKindView>,
    pub fields: Vec<FieldView>,
    pub enum_values: Vec<EnumValue>,
    /// Last value of every collected marker, for custom templates
    pub markers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootKindView {
    pub api_version: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    /// Rendered type cell
    #[serde(rename = "type")]
    pub type_name: String,
    pub doc: String,
    pub default: String,
    pub validation: Vec<String>,
    pub markers: BTreeMap<String, String>,
}

/// Types get a section when they are a root kind or used by another type
#[must_use]
pub fn should_render_type(node: &TypeNode) -> bool {
    node.is_root() || !node.references.is_empty()
}

/// Turns the assembled model into template data, rendering every link in
/// the syntax of the output format.
pub struct ViewBuilder<'a> {
    functions: &'a Functions,
    format: Format,
    model: &'a ApiModel,
}

impl<'a> ViewBuilder<'a> {
    #[must_use]
    pub fn new(functions: &'a Functions, format: Format, model: &'a ApiModel) -> Self {
        Self {
            functions,
            format,
            model,
        }
    }

    #[must_use]
    pub fn document(&self, groups: &[&GroupVersionDetails]) -> DocumentView {
        DocumentView {
            groups: groups.iter().map(|details| self.group_version(details)).collect(),
        }
    }

    fn group_version(&self, details: &GroupVersionDetails) -> GroupVersionView {
        let kinds = details
            .sorted_kinds()
            .into_iter()
            .filter_map(|kind| details.type_for_kind(kind))
            .map(|id| self.render_type_link(id))
            .collect();
        let types = self
            .model
            .sorted_types(details)
            .into_iter()
            .filter(|(_, node)| should_render_type(node))
            .map(|(id, node)| self.type_view(id, node))
            .collect();

        GroupVersionView {
            group: details.group_version.group.clone(),
            version: details.group_version.version.clone(),
            group_version: details.group_version_string(),
            id: self.functions.group_version_id(details),
            link: self.render_gv_link(details),
            doc: details.doc.clone(),
            kinds,
            types,
        }
    }

    fn type_view(&self, id: TypeId, node: &TypeNode) -> TypeView {
        let registry = &self.model.types;
        let underlying = match node.kind {
            TypeKind::Alias { underlying } => Some(self.render_type_link(underlying)),
            _ => None,
        };
        let root_kind = node.root_kind.as_ref().map(|gvk| RootKindView {
            api_version: format!("{}/{}", gvk.group, gvk.version),
            kind: gvk.kind.clone(),
        });

        // the apiVersion and kind rows of a root kind replace its own members
        let fields = registry
            .members(id)
            .iter()
            .filter(|field| {
                root_kind.is_none() || !matches!(field.name.as_str(), "apiVersion" | "kind")
            })
            .map(|field| self.field_view(field))
            .collect();

        TypeView {
            name: node.name.clone(),
            package: node.package.clone(),
            id: self.functions.type_id(node),
            doc: node.doc.clone(),
            underlying,
            validation: node.validation.clone(),
            references: registry
                .sorted_references(id)
                .into_iter()
                .map(|reference| self.render_type_link(reference))
                .collect(),
            root_kind,
            fields,
            enum_values: node.enum_values.clone(),
            markers: marker_view(&node.markers),
        }
    }

    fn field_view(&self, field: &Field) -> FieldView {
        FieldView {
            name: field.name.clone(),
            type_name: self.render_type(field.type_ref),
            doc: field.doc.clone(),
            default: field.default.clone(),
            validation: field.validation.clone(),
            markers: marker_view(&field.markers),
        }
    }

    /// Field type cell: maps spell out key and value, collections append
    /// `array` to the element link.
    #[must_use]
    pub fn render_type(&self, id: TypeId) -> String {
        match self.model.types.get(id).map(|node| node.kind) {
            Some(TypeKind::Map { key, value }) => format!(
                "object (keys:{}, values:{})",
                self.render_type_link(key),
                self.render_type_link(value)
            ),
            Some(TypeKind::Slice { underlying } | TypeKind::Array { underlying, .. }) => {
                format!("{} array", self.render_type_link(underlying))
            }
            _ => self.render_type_link(id),
        }
    }

    #[must_use]
    pub fn render_type_link(&self, id: TypeId) -> String {
        let registry = &self.model.types;
        let text = self.functions.simplified_type_name(registry, id);
        match self.functions.link_for_type(registry, id) {
            None => text,
            Some(Link::Local(anchor)) => self.format.local_link(&anchor, &text),
            Some(Link::External(link)) => self.format.external_link(&link, &text),
        }
    }

    #[must_use]
    pub fn render_gv_link(&self, details: &GroupVersionDetails) -> String {
        self.format.local_link(
            &self.functions.group_version_id(details),
            &details.group_version_string(),
        )
    }
}

fn marker_view(markers: &MarkerValues) -> BTreeMap<String, String> {
    markers
        .iter()
        .filter_map(|(name, values)| {
            values
                .last()
                .map(|value| (name.to_string(), display_value(value)))
        })
        .collect()
}
