use crate::kind::TypeKind;
use crate::types::{Field, TypeId, TypeNode};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::ops::{Index, IndexMut};

/// Arena owning every type node of one generation run.
///
/// Nodes are either *registered* under their identity key (exactly one node
/// per key) or *detached*: stored in the arena and reachable through the
/// [`TypeId`] held by whoever created them, but never returned by an identity
/// lookup. Detached nodes hold degraded results (truncated, excluded or
/// unresolvable types) and maps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeRegistry {
    nodes: Vec<TypeNode>,
    #[serde(skip)]
    index: HashMap<String, TypeId>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node registered under `uid`, creating it from `init` when
    /// absent. The flag reports whether the node already existed.
    ///
    /// A newly created node is visible to lookups immediately, before its
    /// children are resolved, which is what stops recursive resolution of
    /// self-referencing types.
    pub fn get_or_create(&mut self, uid: &str, init: impl FnOnce() -> TypeNode) -> (TypeId, bool) {
        if let Some(&id) = self.index.get(uid) {
            return (id, true);
        }

        let mut node = init();
        node.uid = uid.to_string();
        let id = self.push(node);
        self.index.insert(uid.to_string(), id);
        (id, false)
    }

    /// Store a node without registering its identity
    pub fn add_detached(&mut self, node: TypeNode) -> TypeId {
        self.push(node)
    }

    fn push(&mut self, node: TypeNode) -> TypeId {
        let id = TypeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn lookup(&self, uid: &str) -> Option<TypeId> {
        self.index.get(uid).copied()
    }

    #[must_use]
    pub fn is_registered(&self, id: TypeId) -> bool {
        self.get(id)
            .is_some_and(|node| self.index.get(&node.uid) == Some(&id))
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeNode> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena, detached ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of identity keys
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.index.len()
    }

    /// Every node of the arena in creation order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (TypeId::new(idx), node))
    }

    /// Registered nodes in creation order
    #[must_use]
    pub fn registered_ids(&self) -> Vec<TypeId> {
        let mut ids: Vec<TypeId> = self.index.values().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Whether the type is (a wrapper or map over) basic types only.
    /// Empty interfaces count as basic.
    #[must_use]
    pub fn is_basic(&self, id: TypeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };

        match node.kind {
            TypeKind::Basic | TypeKind::Interface => true,
            TypeKind::Pointer { underlying }
            | TypeKind::Slice { underlying }
            | TypeKind::Array { underlying, .. } => self.is_basic(underlying),
            TypeKind::Map { key, value } => self.is_basic(key) && self.is_basic(value),
            _ => false,
        }
    }

    /// The node whose field list `members` returns for `id`: the type itself
    /// when it has fields, otherwise the first node with fields found through
    /// alias, pointer and collection wrapping.
    #[must_use]
    pub fn members_owner(&self, id: TypeId) -> Option<TypeId> {
        let mut current = id;
        let mut seen = HashSet::new();
        loop {
            let node = self.get(current)?;
            if !node.fields.is_empty() {
                return Some(current);
            }
            if !seen.insert(current) {
                return None;
            }
            match node.kind {
                TypeKind::Alias { underlying }
                | TypeKind::Pointer { underlying }
                | TypeKind::Slice { underlying }
                | TypeKind::Array { underlying, .. } => current = underlying,
                _ => return None,
            }
        }
    }

    /// The record reached from `id` through alias, pointer and collection
    /// wrapping, if any
    #[must_use]
    pub fn underlying_record(&self, id: TypeId) -> Option<TypeId> {
        let mut current = id;
        let mut seen = HashSet::new();
        while seen.insert(current) {
            let node = self.get(current)?;
            match node.kind {
                TypeKind::Record => return Some(current),
                TypeKind::Alias { underlying }
                | TypeKind::Pointer { underlying }
                | TypeKind::Slice { underlying }
                | TypeKind::Array { underlying, .. } => current = underlying,
                _ => return None,
            }
        }
        None
    }

    /// Record fields reachable from `id`
    #[must_use]
    pub fn members(&self, id: TypeId) -> &[Field] {
        self.members_owner(id)
            .map_or(&[], |owner| self.nodes[owner.index()].fields.as_slice())
    }

    /// Whether any member of `id` still awaits inlining
    #[must_use]
    pub fn contains_inlined_types(&self, id: TypeId) -> bool {
        self.members(id).iter().any(|field| field.inlined)
    }

    /// Display form: `map[K]V`, `[]pkg.Foo`, `*pkg.Foo`, `[3]pkg.Foo`,
    /// `pkg.Foo`, or `<unknown>` for an id outside the arena.
    #[must_use]
    pub fn type_string(&self, id: TypeId) -> String {
        let Some(node) = self.get(id) else {
            return "<unknown>".to_string();
        };

        match node.kind {
            TypeKind::Map { key, value } => {
                format!("map[{}]{}", self.type_string(key), self.type_string(value))
            }
            TypeKind::Slice { underlying } => format!("[]{}", self.type_string(underlying)),
            TypeKind::Pointer { underlying } => format!("*{}", self.type_string(underlying)),
            TypeKind::Array { len, underlying } => {
                format!("[{len}]{}", self.type_string(underlying))
            }
            _ => node.identifier(),
        }
    }

    /// Referencing types ordered by name, then package
    #[must_use]
    pub fn sorted_references(&self, id: TypeId) -> Vec<TypeId> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };

        let mut refs: Vec<(TypeId, &TypeNode)> = node
            .references
            .iter()
            .filter_map(|&r| self.get(r).map(|parent| (r, parent)))
            .collect();
        refs.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name).then_with(|| a.package.cmp(&b.package)));
        refs.into_iter().map(|(r, _)| r).collect()
    }

    /// Fields of `id` ordered by name
    #[must_use]
    pub fn sorted_fields(&self, id: TypeId) -> Vec<&Field> {
        let mut fields: Vec<&Field> = self.members(id).iter().collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        fields
    }
}

impl Index<TypeId> for TypeRegistry {
    type Output = TypeNode;

    fn index(&self, id: TypeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

impl IndexMut<TypeId> for TypeRegistry {
    fn index_mut(&mut self, id: TypeId) -> &mut Self::Output {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(registry: &mut TypeRegistry, name: &str) -> TypeId {
        registry
            .get_or_create(name, || {
                TypeNode::new(name, name, "").with_kind(TypeKind::Basic)
            })
            .0
    }

    #[test]
    fn get_or_create_returns_existing_node() {
        let mut registry = TypeRegistry::new();
        let (first, existed) = registry.get_or_create("pkg.Foo", || TypeNode::new("", "Foo", "pkg"));
        assert!(!existed);

        let (second, existed) =
            registry.get_or_create("pkg.Foo", || panic!("must not create twice"));
        assert!(existed);
        assert_eq!(first, second);
        assert_eq!(registry[first].uid, "pkg.Foo");
        assert_eq!(registry.registered_count(), 1);
    }

    #[test]
    fn detached_nodes_are_not_registered() {
        let mut registry = TypeRegistry::new();
        let id = registry.add_detached(TypeNode::new("pkg.Foo", "Foo", "pkg"));

        assert!(!registry.is_registered(id));
        assert!(registry.lookup("pkg.Foo").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn type_string_renders_wrappers() {
        let mut registry = TypeRegistry::new();
        let string = basic(&mut registry, "string");
        let (foo, _) = registry.get_or_create("pkg.Foo", || {
            TypeNode::new("", "Foo", "pkg").with_kind(TypeKind::Record)
        });
        let ptr = registry.add_detached(
            TypeNode::new("*pkg.Foo", "Foo", "pkg").with_kind(TypeKind::Pointer { underlying: foo }),
        );
        let slice = registry.add_detached(
            TypeNode::new("[]*pkg.Foo", "Foo", "pkg")
                .with_kind(TypeKind::Slice { underlying: ptr }),
        );
        let map = registry.add_detached(
            TypeNode::new("map[string][]*pkg.Foo", "map[string][]*Foo", "pkg")
                .with_kind(TypeKind::Map { key: string, value: slice }),
        );

        assert_eq!(registry.type_string(map), "map[string][]*pkg.Foo");
        assert_eq!(registry.type_string(TypeId::new(99)), "<unknown>");
        assert!(!registry.is_basic(map));
        assert!(registry.is_basic(string));
    }

    #[test]
    fn members_follow_wrappers_and_stop_on_cycles() {
        let mut registry = TypeRegistry::new();
        let string = basic(&mut registry, "string");
        let (record, _) = registry.get_or_create("pkg.R", || {
            TypeNode::new("", "R", "pkg").with_kind(TypeKind::Record)
        });
        registry[record].fields.push(Field::new("x", string));
        let ptr = registry.add_detached(
            TypeNode::new("*pkg.R", "R", "pkg").with_kind(TypeKind::Pointer { underlying: record }),
        );
        assert_eq!(registry.members_owner(ptr), Some(record));
        assert_eq!(registry.members(ptr).len(), 1);

        // type A []A
        let (alias, _) = registry.get_or_create("pkg.A", || TypeNode::new("", "A", "pkg"));
        let slice = registry.add_detached(
            TypeNode::new("[]pkg.A", "A", "pkg").with_kind(TypeKind::Slice { underlying: alias }),
        );
        registry[alias].kind = TypeKind::Alias { underlying: slice };
        assert!(registry.members(alias).is_empty());
        assert!(!registry.contains_inlined_types(alias));
        assert_eq!(registry.underlying_record(alias), None);
    }

    #[test]
    fn sorted_references_order_by_name_then_package() {
        let mut registry = TypeRegistry::new();
        let string = basic(&mut registry, "string");
        let mut record = |uid: &str, name: &str, package: &str| {
            registry
                .get_or_create(uid, || TypeNode::new("", name, package).with_kind(TypeKind::Record))
                .0
        };
        let beta = record("b.Beta", "Beta", "b");
        let alpha_b = record("b.Alpha", "Alpha", "b");
        let alpha_a = record("a.Alpha", "Alpha", "a");
        let (child, _) = registry.get_or_create("a.Child", || {
            TypeNode::new("", "Child", "a").with_kind(TypeKind::Alias { underlying: string })
        });
        registry[child].references = vec![beta, alpha_b, alpha_a];

        assert_eq!(registry.sorted_references(child), vec![alpha_a, alpha_b, beta]);
        assert!(registry.sorted_references(TypeId::new(99)).is_empty());
    }

    #[test]
    fn underlying_record_skips_wrappers_only() {
        let mut registry = TypeRegistry::new();
        let string = basic(&mut registry, "string");
        let (empty, _) = registry.get_or_create("pkg.Empty", || {
            TypeNode::new("", "Empty", "pkg").with_kind(TypeKind::Record)
        });
        let ptr = registry.add_detached(
            TypeNode::new("*pkg.Empty", "Empty", "pkg")
                .with_kind(TypeKind::Pointer { underlying: empty }),
        );
        let (phase, _) = registry.get_or_create("pkg.Phase", || {
            TypeNode::new("", "Phase", "pkg").with_kind(TypeKind::Alias { underlying: string })
        });

        assert_eq!(registry.underlying_record(ptr), Some(empty));
        assert_eq!(registry.underlying_record(phase), None);
        assert_eq!(registry.underlying_record(string), None);
    }
}
