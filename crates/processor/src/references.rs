use crate::error::{ProcessorError, Result};
use refdoc_model::{TypeId, TypeKind, TypeRegistry};
use std::collections::{BTreeMap, BTreeSet};

/// Back-edges from each type to the types whose structure contains it
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    parents: BTreeMap<TypeId, BTreeSet<TypeId>>,
}

impl ReferenceGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `parent` contains `child`. Wrappers and maps are looked
    /// through; only named types (aliases and records) receive the edge.
    pub fn add_reference(&mut self, registry: &TypeRegistry, parent: TypeId, child: TypeId) {
        let Some(node) = registry.get(child) else {
            return;
        };

        match node.kind {
            TypeKind::Pointer { underlying }
            | TypeKind::Slice { underlying }
            | TypeKind::Array { underlying, .. } => self.add_reference(registry, parent, underlying),
            TypeKind::Map { key, value } => {
                self.add_reference(registry, parent, key);
                self.add_reference(registry, parent, value);
            }
            TypeKind::Alias { .. } | TypeKind::Record => {
                self.parents.entry(child).or_default().insert(parent);
            }
            // a registered placeholder is a named type still being resolved
            TypeKind::Unknown if registry.is_registered(child) => {
                self.parents.entry(child).or_default().insert(parent);
            }
            _ => {}
        }
    }

    /// Every type referenced by `original` becomes referenced by `additional`
    /// as well.
    pub fn propagate_reference(&mut self, original: TypeId, additional: TypeId) {
        for parents in self.parents.values_mut() {
            if parents.contains(&original) {
                parents.insert(additional);
            }
        }
    }

    #[must_use]
    pub fn parents(&self, child: TypeId) -> Option<&BTreeSet<TypeId>> {
        self.parents.get(&child)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Store the back-edges on the nodes. Parents that are detached or basic
    /// are dropped; a child missing from the registry is an internal error.
    pub fn attach(&self, registry: &mut TypeRegistry) -> Result<()> {
        for (&child, parents) in &self.parents {
            if !registry.is_registered(child) {
                let identity = registry
                    .get(child)
                    .map_or_else(|| child.to_string(), |node| node.uid.clone());
                return Err(ProcessorError::TypeNotLoaded(identity));
            }

            let references: Vec<TypeId> = parents
                .iter()
                .copied()
                .filter(|&parent| {
                    registry.is_registered(parent)
                        && !matches!(registry[parent].kind, TypeKind::Basic)
                })
                .collect();
            registry[child].references = references;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdoc_model::TypeNode;

    fn named(registry: &mut TypeRegistry, name: &str, kind: TypeKind) -> TypeId {
        registry
            .get_or_create(&format!("p.{name}"), || {
                TypeNode::new("", name, "p").with_kind(kind)
            })
            .0
    }

    #[test]
    fn wrappers_and_maps_are_looked_through() {
        let mut registry = TypeRegistry::new();
        let (string, _) = registry.get_or_create("string", || {
            TypeNode::new("", "string", "").with_kind(TypeKind::Basic)
        });
        let parent = named(&mut registry, "Parent", TypeKind::Record);
        let child = named(&mut registry, "Child", TypeKind::Record);
        let ptr = registry.add_detached(
            TypeNode::new("*p.Child", "Child", "p").with_kind(TypeKind::Pointer { underlying: child }),
        );
        let map = registry.add_detached(
            TypeNode::new("map[string]*p.Child", "map[string]*Child", "p")
                .with_kind(TypeKind::Map { key: string, value: ptr }),
        );

        let mut graph = ReferenceGraph::new();
        graph.add_reference(&registry, parent, map);

        assert_eq!(graph.len(), 1);
        assert!(graph.parents(child).unwrap().contains(&parent));
        assert!(graph.parents(string).is_none());
    }

    #[test]
    fn propagate_adds_parent_to_every_referencing_set() {
        let mut registry = TypeRegistry::new();
        let x = named(&mut registry, "X", TypeKind::Record);
        let q = named(&mut registry, "Q", TypeKind::Record);
        let a = named(&mut registry, "A", TypeKind::Alias { underlying: x });
        let b = named(&mut registry, "B", TypeKind::Record);

        let mut graph = ReferenceGraph::new();
        graph.add_reference(&registry, x, a);
        graph.add_reference(&registry, x, b);
        graph.add_reference(&registry, q, b);
        graph.propagate_reference(x, q);

        assert!(graph.parents(a).unwrap().contains(&q));
        assert_eq!(graph.parents(b).unwrap().len(), 2);
    }

    #[test]
    fn attach_drops_detached_parents() {
        let mut registry = TypeRegistry::new();
        let child = named(&mut registry, "Child", TypeKind::Record);
        let parent = named(&mut registry, "Parent", TypeKind::Record);
        let stub = registry.add_detached(TypeNode::new("p.Stub", "Stub", "p"));

        let mut graph = ReferenceGraph::new();
        graph.add_reference(&registry, parent, child);
        graph.add_reference(&registry, stub, child);
        graph.attach(&mut registry).unwrap();

        assert_eq!(registry[child].references, vec![parent]);
    }

    #[test]
    fn attach_fails_for_unregistered_child() {
        let mut registry = TypeRegistry::new();
        let parent = named(&mut registry, "Parent", TypeKind::Record);
        let orphan = registry.add_detached(
            TypeNode::new("p.Orphan", "Orphan", "p").with_kind(TypeKind::Record),
        );

        let mut graph = ReferenceGraph::new();
        graph.add_reference(&registry, parent, orphan);
        let err = graph.attach(&mut registry).unwrap_err();
        assert!(matches!(err, ProcessorError::TypeNotLoaded(uid) if uid == "p.Orphan"));
    }
}
