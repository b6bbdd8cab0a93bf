use crate::marker_registry::{DEFAULT_MARKER, VALIDATION_PREFIX};
use refdoc_model::{display_value, MarkerValues, TypeId, TypeKind, TypeRegistry};
use serde_json::Value;
use std::collections::HashSet;

/// Derive the display default value and validation constraints from a marker
/// set. Markers are visited in name order and the last declared value wins.
#[must_use]
pub fn parse_markers(markers: &MarkerValues) -> (String, Vec<String>) {
    let mut default = String::new();
    let mut validation = Vec::new();

    for (name, values) in markers.iter() {
        let Some(value) = values.last() else {
            continue;
        };

        if let Some(constraint) = name.strip_prefix(VALIDATION_PREFIX) {
            let shown = match constraint {
                "Pattern" => format!("`{}`", display_value(value)),
                // unreadable when rendered
                "XValidation" => continue,
                _ => display_value(value),
            };
            validation.push(format!("{constraint}: {shown}"));
        }

        if name == DEFAULT_MARKER {
            default = default_display(value);
        }
    }

    (default, validation)
}

fn default_display(value: &Value) -> String {
    let shown = display_value(value);
    match shown.strip_prefix("map[") {
        Some(inner) => format!("{{ {} }}", inner.strip_suffix(']').unwrap_or(inner)),
        None => shown,
    }
}

/// Copy markers down alias and pointer chains, then from each field's type to
/// the field. Names already present are kept.
pub fn propagate_markers(registry: &mut TypeRegistry) {
    let mut done = HashSet::new();
    for id in registry.registered_ids() {
        propagate_type(registry, id, &mut done);

        for idx in 0..registry[id].fields.len() {
            let field_type = registry[id].fields[idx].type_ref;
            propagate_type(registry, field_type, &mut done);

            let inherited = registry[field_type].markers.clone();
            registry[id].fields[idx].markers.inherit_from(&inherited);
        }
    }
}

fn propagate_type(registry: &mut TypeRegistry, id: TypeId, done: &mut HashSet<TypeId>) {
    let underlying = match registry[id].kind {
        TypeKind::Alias { underlying } | TypeKind::Pointer { underlying } => underlying,
        _ => return,
    };
    if !done.insert(id) {
        return;
    }

    propagate_type(registry, underlying, done);
    let inherited = registry[underlying].markers.clone();
    let count = registry[id].markers.inherit_from(&inherited);
    if count > 0 {
        log::debug!("{} inherited {count} markers", registry[id].uid);
    }
}

/// Set `default` and `validation` of every node and field from its markers
pub fn apply_markers(registry: &mut TypeRegistry) {
    for idx in 0..registry.len() {
        let node = &mut registry[TypeId::new(idx)];
        (node.default, node.validation) = parse_markers(&node.markers);
        for field in &mut node.fields {
            (field.default, field.validation) = parse_markers(&field.markers);
        }
    }
}
