use crate::references::ReferenceGraph;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use refdoc_model::{Diagnostic, DiagnosticKind, TypeId, TypeRegistry};

/// Outcome of the inlining pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineReport {
    pub iterations: usize,
    pub spliced: usize,
    /// Inlined fields left in place
    pub remaining: usize,
}

/// Replace every inlined field with the members of its target type.
///
/// A target is spliced only once it has no inlined fields of its own, so
/// nested embedding settles bottom-up over successive iterations. The loop
/// ends when nothing is pending, when an iteration makes no progress (cyclic
/// or unresolvable inlines), or after `max_iterations`.
pub fn inline_types(
    registry: &mut TypeRegistry,
    references: &mut ReferenceGraph,
    max_iterations: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> InlineReport {
    let hosts = host_order(registry);
    let mut report = InlineReport::default();

    for iteration in 0..max_iterations {
        report.iterations = iteration + 1;
        let mut pending = 0;
        let mut spliced = 0;

        for &host in &hosts {
            for idx in (0..registry[host].fields.len()).rev() {
                let field = &registry[host].fields[idx];
                if !field.inlined {
                    continue;
                }
                pending += 1;

                let target = field.type_ref;
                if !registry.is_registered(target) {
                    let field_name = field.name.clone();
                    let host_uid = registry[host].uid.clone();
                    log::warn!("Unable to find embedded type {field_name} of {host_uid}");
                    let diagnostic = Diagnostic::new(
                        host_uid,
                        DiagnosticKind::MissingInlineTarget { field: field_name },
                    );
                    if !diagnostics.contains(&diagnostic) {
                        diagnostics.push(diagnostic);
                    }
                    continue;
                }

                if registry.contains_inlined_types(target) {
                    continue;
                }

                log::debug!(
                    "Inlining embedded type {} into {}",
                    registry[target].uid,
                    registry[host].uid
                );
                let owner = registry.members_owner(target).unwrap_or(target);
                let members = registry.members(target).to_vec();
                registry[host].fields.splice(idx..=idx, members);
                references.propagate_reference(owner, host);
                spliced += 1;
            }
        }

        report.spliced += spliced;
        if pending == 0 {
            return report;
        }
        if spliced == 0 {
            break;
        }
    }

    for &host in &hosts {
        let remaining = registry[host].fields.iter().filter(|f| f.inlined).count();
        if remaining == 0 {
            continue;
        }
        report.remaining += remaining;
        let diagnostic = Diagnostic::new(
            registry[host].uid.clone(),
            DiagnosticKind::UnresolvedInlines { remaining },
        );
        if !diagnostics.contains(&diagnostic) {
            diagnostics.push(diagnostic);
        }
    }
    if report.remaining > 0 {
        log::warn!("Failed to inline all inlined types, remaining: {}", report.remaining);
    }
    report
}

/// Registered records in inline-dependency order (targets before the types
/// inlining them), or registry order when the dependencies form a cycle.
fn host_order(registry: &TypeRegistry) -> Vec<TypeId> {
    let hosts: Vec<TypeId> = registry
        .registered_ids()
        .into_iter()
        .filter(|&id| !registry[id].fields.is_empty())
        .collect();

    let mut graph: DiGraphMap<TypeId, ()> = DiGraphMap::new();
    for &host in &hosts {
        graph.add_node(host);
        for field in registry[host].fields.iter().filter(|f| f.inlined) {
            if let Some(owner) = registry.members_owner(field.type_ref) {
                graph.add_edge(owner, host, ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(order) => order
            .into_iter()
            .filter(|id| !registry[*id].fields.is_empty() && registry.is_registered(*id))
            .collect(),
        Err(cycle) => {
            log::debug!("Inline dependencies cycle through {}", cycle.node_id());
            hosts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refdoc_model::{Field, TypeKind, TypeNode};

    fn record(registry: &mut TypeRegistry, name: &str) -> TypeId {
        registry
            .get_or_create(&format!("p.{name}"), || {
                TypeNode::new("", name, "p").with_kind(TypeKind::Record)
            })
            .0
    }

    fn basic(registry: &mut TypeRegistry) -> TypeId {
        registry
            .get_or_create("string", || {
                TypeNode::new("", "string", "").with_kind(TypeKind::Basic)
            })
            .0
    }

    fn inlined(name: &str, type_ref: TypeId) -> Field {
        let mut field = Field::new(name, type_ref);
        field.embedded = true;
        field.inlined = true;
        field
    }

    fn names(registry: &TypeRegistry, id: TypeId) -> Vec<String> {
        registry[id].fields.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn three_level_chain_flattens_in_declaration_order() {
        let mut registry = TypeRegistry::new();
        let string = basic(&mut registry);
        let a = record(&mut registry, "A");
        let b = record(&mut registry, "B");
        let c = record(&mut registry, "C");

        registry[c].fields = vec![Field::new("c1", string), Field::new("c2", string)];
        registry[b].fields = vec![inlined("C", c)];
        registry[a].fields = vec![
            Field::new("a1", string),
            inlined("B", b),
            Field::new("a2", string),
        ];

        let mut refs = ReferenceGraph::new();
        let mut diagnostics = Vec::new();
        let report = inline_types(&mut registry, &mut refs, 100, &mut diagnostics);

        assert_eq!(names(&registry, a), vec!["a1", "c1", "c2", "a2"]);
        assert_eq!(names(&registry, b), vec!["c1", "c2"]);
        assert_eq!(report.remaining, 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn wrapper_target_splices_record_members() {
        let mut registry = TypeRegistry::new();
        let string = basic(&mut registry);
        let host = record(&mut registry, "Host");
        let base = record(&mut registry, "Base");
        registry[base].fields = vec![Field::new("x", string)];
        let (ptr, _) = registry.get_or_create("*p.Base", || {
            TypeNode::new("", "Base", "p").with_kind(TypeKind::Pointer { underlying: base })
        });
        registry[host].fields = vec![inlined("Base", ptr), Field::new("y", string)];

        let mut refs = ReferenceGraph::new();
        refs.add_reference(&registry, base, string);
        let child = record(&mut registry, "Child");
        refs.add_reference(&registry, base, child);

        let mut diagnostics = Vec::new();
        inline_types(&mut registry, &mut refs, 100, &mut diagnostics);

        assert_eq!(names(&registry, host), vec!["x", "y"]);
        assert!(refs.parents(child).unwrap().contains(&host));
    }

    #[test]
    fn self_inline_stops_without_progress() {
        let mut registry = TypeRegistry::new();
        let string = basic(&mut registry);
        let looped = record(&mut registry, "Loop");
        registry[looped].fields = vec![Field::new("x", string), inlined("Loop", looped)];

        let mut refs = ReferenceGraph::new();
        let mut diagnostics = Vec::new();
        let report = inline_types(&mut registry, &mut refs, 100, &mut diagnostics);

        assert_eq!(report.iterations, 1);
        assert_eq!(report.remaining, 1);
        assert_eq!(names(&registry, looped), vec!["x", "Loop"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new(
                "p.Loop",
                DiagnosticKind::UnresolvedInlines { remaining: 1 }
            )]
        );
    }

    #[test]
    fn missing_target_is_left_in_place() {
        let mut registry = TypeRegistry::new();
        let host = record(&mut registry, "Host");
        let stub = registry.add_detached(TypeNode::new("p.Gone", "Gone", "p"));
        registry[host].fields = vec![inlined("Gone", stub)];

        let mut refs = ReferenceGraph::new();
        let mut diagnostics = Vec::new();
        let report = inline_types(&mut registry, &mut refs, 100, &mut diagnostics);

        assert_eq!(report.remaining, 1);
        assert_eq!(names(&registry, host), vec!["Gone"]);
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::MissingInlineTarget { field: "Gone".into() }
        );
    }

    #[test]
    fn iteration_ceiling_is_respected() {
        let mut registry = TypeRegistry::new();
        let string = basic(&mut registry);
        let a = record(&mut registry, "A");
        let b = record(&mut registry, "B");
        registry[b].fields = vec![Field::new("b", string)];
        registry[a].fields = vec![inlined("B", b)];

        let mut refs = ReferenceGraph::new();
        let mut diagnostics = Vec::new();
        let report = inline_types(&mut registry, &mut refs, 0, &mut diagnostics);

        assert_eq!(report.iterations, 0);
        assert_eq!(report.remaining, 1);
        assert_eq!(names(&registry, a), vec!["B"]);
        assert_eq!(diagnostics.len(), 1);
    }
}
