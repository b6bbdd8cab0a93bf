use crate::compiled::CompiledConfig;
use crate::config::MarkerTarget;
use crate::docs::{extract_doc, unquote};
use crate::marker_registry::MarkerRegistry;
use crate::references::ReferenceGraph;
use refdoc_model::{
    Diagnostic, DiagnosticKind, EnumValue, TypeId, TypeKind, TypeNode, TypeRegistry,
};
use refdoc_source::{Package, RawType, TypeDecl, TypeInfoProvider};

/// Per-run resolution context: the registry being filled, the reference
/// graph, the exclusion rules and the depth limit.
pub struct Resolver<'a> {
    provider: &'a dyn TypeInfoProvider,
    pub(crate) config: &'a CompiledConfig,
    pub(crate) markers: &'a MarkerRegistry,
    max_depth: usize,
    pub(crate) registry: TypeRegistry,
    pub(crate) references: ReferenceGraph,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        provider: &'a dyn TypeInfoProvider,
        config: &'a CompiledConfig,
        markers: &'a MarkerRegistry,
        max_depth: usize,
    ) -> Self {
        Self {
            provider,
            config,
            markers,
            max_depth,
            registry: TypeRegistry::new(),
            references: ReferenceGraph::new(),
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn references(&self) -> &ReferenceGraph {
        &self.references
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (TypeRegistry, ReferenceGraph, Vec<Diagnostic>) {
        (self.registry, self.references, self.diagnostics)
    }

    /// Resolve a type expression into a node of the registry.
    ///
    /// Always yields a node: anomalies produce a detached `Unknown` or
    /// `Unsupported` node and a diagnostic.
    pub fn resolve(&mut self, ty: &RawType, depth: usize) -> TypeId {
        match ty {
            RawType::Basic { name } => self.resolve_basic(name),
            RawType::Named { package, name } => self.resolve_named(package, name, depth),
            RawType::Pointer { elem } => {
                self.resolve_wrapper(ty, elem, depth, |underlying| TypeKind::Pointer { underlying })
            }
            RawType::Slice { elem } => {
                self.resolve_wrapper(ty, elem, depth, |underlying| TypeKind::Slice { underlying })
            }
            RawType::Array { len, elem } => {
                let len = *len;
                self.resolve_wrapper(ty, elem, depth, move |underlying| TypeKind::Array {
                    len,
                    underlying,
                })
            }
            RawType::Map { key, value } => self.resolve_map(ty, key, value, depth),
            RawType::Interface { methods } if methods.is_empty() => {
                self.registry
                    .get_or_create("interface{}", || {
                        TypeNode::new("", "interface{}", "").with_kind(TypeKind::Interface)
                    })
                    .0
            }
            RawType::Interface { .. } => {
                let uid = ty.uid();
                log::warn!("Interfaces declaring methods are not supported: {uid}");
                self.degraded(
                    TypeNode::new(uid, "", ""),
                    TypeKind::Unsupported,
                    DiagnosticKind::UnsupportedInterface,
                )
            }
            RawType::Struct { .. } => {
                let uid = ty.uid();
                log::warn!("Anonymous structs are not supported: {uid}");
                self.degraded(
                    TypeNode::new(uid, "", ""),
                    TypeKind::Unsupported,
                    DiagnosticKind::AnonymousRecord,
                )
            }
            RawType::Invalid => {
                log::warn!("Failed to determine type");
                self.degraded(
                    TypeNode::new(ty.uid(), ty.uid(), ""),
                    TypeKind::Unknown,
                    DiagnosticKind::InvalidType,
                )
            }
        }
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    fn degraded(&mut self, node: TypeNode, kind: TypeKind, reason: DiagnosticKind) -> TypeId {
        self.report(Diagnostic::new(node.uid.clone(), reason));
        self.registry.add_detached(node.with_kind(kind))
    }

    fn resolve_basic(&mut self, name: &str) -> TypeId {
        self.registry
            .get_or_create(name, || TypeNode::new("", name, "").with_kind(TypeKind::Basic))
            .0
    }

    fn resolve_named(&mut self, package: &str, name: &str, depth: usize) -> TypeId {
        let mut stub = TypeNode::new("", name, package);
        let uid = stub.identifier();
        stub.uid.clone_from(&uid);

        if self.config.should_ignore_type(&uid) {
            log::debug!("Skipping excluded type {uid}");
            return self.degraded(stub, TypeKind::Unknown, DiagnosticKind::Excluded);
        }

        if let Some(id) = self.registry.lookup(&uid) {
            return id;
        }

        let provider = self.provider;
        if provider.package(package).is_none() {
            log::warn!("Imported type cannot be found: {uid}");
            let reason = DiagnosticKind::PackageNotLoaded {
                package: package.to_string(),
            };
            return self.degraded(stub, TypeKind::Unknown, reason);
        }
        let Some((pkg, decl)) = provider.lookup_type(package, name) else {
            log::warn!("Type declaration cannot be found: {uid}");
            return self.degraded(stub, TypeKind::Unknown, DiagnosticKind::NotFound);
        };

        stub.doc = extract_doc(&decl.doc, self.config.use_raw_docstring);
        stub.markers = self.markers.filter(MarkerTarget::Type, &decl.markers);

        if depth > self.max_depth {
            log::debug!("Not loading type due to reaching max recursion depth: {uid}");
            return self.degraded(stub, TypeKind::Unknown, DiagnosticKind::DepthExceeded { depth });
        }

        log::debug!("Load {uid}");
        let (id, _) = self.registry.get_or_create(&uid, || stub);
        self.expand_declaration(id, pkg, decl, depth);
        id
    }

    fn expand_declaration(&mut self, id: TypeId, pkg: &'a Package, decl: &'a TypeDecl, depth: usize) {
        if let RawType::Struct { members } = &decl.definition {
            self.registry[id].kind = TypeKind::Record;
            let identifier = self.registry[id].identifier();
            self.collect_fields(id, &identifier, members, depth + 1);
            return;
        }

        if decl.definition.is_string() {
            self.registry[id].enum_values = self.enum_values(pkg, &decl.name);
        }

        let underlying = self.resolve(&decl.definition, depth + 1);
        self.registry[id].kind = TypeKind::Alias { underlying };
        self.references.add_reference(&self.registry, id, underlying);
    }

    /// Constants typed with the alias that hold exactly one literal, in
    /// declaration order
    fn enum_values(&self, pkg: &Package, alias: &str) -> Vec<EnumValue> {
        pkg.constants_of(alias)
            .filter_map(|constant| {
                constant.single_literal().map(|literal| EnumValue {
                    name: unquote(literal).to_string(),
                    doc: extract_doc(&constant.doc, self.config.use_raw_docstring),
                })
            })
            .collect()
    }

    fn resolve_wrapper(
        &mut self,
        ty: &RawType,
        elem: &RawType,
        depth: usize,
        wrap: impl FnOnce(TypeId) -> TypeKind,
    ) -> TypeId {
        let uid = ty.uid();
        if let Some(id) = self.registry.lookup(&uid) {
            return id;
        }

        if depth > self.max_depth {
            log::debug!("Not loading type due to reaching max recursion depth: {uid}");
            let node = TypeNode::new(uid, ty.display_name(), "");
            return self.degraded(node, TypeKind::Unknown, DiagnosticKind::DepthExceeded { depth });
        }

        let underlying = self.resolve(elem, depth + 1);
        let (name, package) = {
            let inner = &self.registry[underlying];
            (inner.name.clone(), inner.package.clone())
        };

        // a wrapper around a truncated or detached element must not be
        // reused by shallower occurrences of the same expression
        if !self.registry.is_registered(underlying) {
            return self
                .registry
                .add_detached(TypeNode::new(uid, name, package).with_kind(wrap(underlying)));
        }

        self.registry
            .get_or_create(&uid, || TypeNode::new("", name, package).with_kind(wrap(underlying)))
            .0
    }

    fn resolve_map(&mut self, ty: &RawType, key: &RawType, value: &RawType, depth: usize) -> TypeId {
        let uid = ty.uid();
        if depth > self.max_depth {
            log::debug!("Not loading type due to reaching max recursion depth: {uid}");
            let node = TypeNode::new(uid, ty.display_name(), "");
            return self.degraded(node, TypeKind::Unknown, DiagnosticKind::DepthExceeded { depth });
        }

        let key = self.resolve(key, depth + 1);
        let value = self.resolve(value, depth + 1);
        let package = self.registry[value].package.clone();
        self.registry.add_detached(
            TypeNode::new(uid, ty.display_name(), package).with_kind(TypeKind::Map { key, value }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessorConfig;
    use pretty_assertions::assert_eq;
    use refdoc_source::{ConstDecl, ConstExpr, Member, SourceSet};

    const PKG: &str = "example.com/api/v1";

    fn with_resolver<T>(
        packages: Vec<Package>,
        config: ProcessorConfig,
        run: impl FnOnce(&mut Resolver<'_>) -> T,
    ) -> T {
        let source = SourceSet::new(packages).unwrap();
        let compiled = CompiledConfig::compile(&config).unwrap();
        let markers = MarkerRegistry::builtin();
        let mut resolver = Resolver::new(&source, &compiled, &markers, config.max_depth);
        run(&mut resolver)
    }

    fn named(name: &str) -> RawType {
        RawType::named(PKG, name)
    }

    #[test]
    fn basic_types_are_shared_and_unqualified() {
        let pkg = Package::new(PKG, "v1");
        with_resolver(vec![pkg], ProcessorConfig::default(), |r| {
            let a = r.resolve(&RawType::basic("string"), 0);
            let b = r.resolve(&RawType::basic("string"), 5);
            assert_eq!(a, b);
            assert_eq!(r.registry()[a].kind, TypeKind::Basic);
            assert_eq!(r.registry()[a].package, "");
        });
    }

    #[test]
    fn self_referencing_record_has_one_node() {
        let pkg = Package::new(PKG, "v1").with_type(TypeDecl::record(
            "Node",
            vec![
                Member::new("Value", RawType::basic("string")).with_json("value"),
                Member::new("Next", RawType::pointer(named("Node"))).with_json("next"),
            ],
        ));

        with_resolver(vec![pkg], ProcessorConfig::default(), |r| {
            let node = r.resolve(&named("Node"), 0);
            let registry = r.registry();

            assert_eq!(registry[node].kind, TypeKind::Record);
            assert_eq!(registry[node].fields.len(), 2);
            let next = registry[node].fields[1].type_ref;
            assert_eq!(registry[next].kind, TypeKind::Pointer { underlying: node });
            assert_eq!(registry.lookup("example.com/api/v1.Node"), Some(node));
            assert!(r.references().parents(node).unwrap().contains(&node));
            assert!(r.diagnostics().is_empty());
        });
    }

    #[test]
    fn repeated_wrappers_share_one_node() {
        let pkg = Package::new(PKG, "v1").with_type(TypeDecl::record("Item", vec![]));
        with_resolver(vec![pkg], ProcessorConfig::default(), |r| {
            let first = r.resolve(&RawType::slice(named("Item")), 0);
            let second = r.resolve(&RawType::slice(named("Item")), 3);
            assert_eq!(first, second);
            assert_eq!(r.registry()[first].name, "Item");
            assert_eq!(r.registry()[first].package, PKG);

            let strings = r.resolve(&RawType::slice(RawType::basic("string")), 0);
            assert_eq!(r.registry()[strings].package, "");
        });
    }

    #[test]
    fn depth_limit_truncates_without_expanding() {
        // Level0 -> Level1 -> Level2, each through a named record
        let pkg = Package::new(PKG, "v1")
            .with_type(TypeDecl::record("Level0", vec![Member::new("Next", named("Level1"))]))
            .with_type(TypeDecl::record("Level1", vec![Member::new("Next", named("Level2"))]))
            .with_type(TypeDecl::record(
                "Level2",
                vec![Member::new("Leaf", RawType::basic("string"))],
            ));
        let config = ProcessorConfig {
            max_depth: 1,
            ..ProcessorConfig::default()
        };

        with_resolver(vec![pkg], config, |r| {
            let root = r.resolve(&named("Level0"), 0);
            let registry = r.registry();
            let level1 = registry[root].fields[0].type_ref;
            assert_eq!(registry[level1].kind, TypeKind::Record);

            let level2 = registry[level1].fields[0].type_ref;
            assert_eq!(registry[level2].kind, TypeKind::Unknown);
            assert!(registry[level2].fields.is_empty());
            assert!(!registry.is_registered(level2));
            assert!(registry.lookup("example.com/api/v1.Level2").is_none());
            assert_eq!(
                r.diagnostics(),
                &[Diagnostic::new(
                    "example.com/api/v1.Level2",
                    DiagnosticKind::DepthExceeded { depth: 2 }
                )]
            );
        });
    }

    #[test]
    fn truncated_wrapper_is_not_reused_at_shallow_depth() {
        // Deep -> Middle -> *Leaf reaches Leaf past the limit, Shallow -> *Leaf does not
        let pkg = Package::new(PKG, "v1")
            .with_type(TypeDecl::record("Deep", vec![Member::new("Middle", named("Middle"))]))
            .with_type(TypeDecl::record(
                "Middle",
                vec![Member::new("Leaf", RawType::pointer(named("Leaf")))],
            ))
            .with_type(TypeDecl::record(
                "Shallow",
                vec![Member::new("Leaf", RawType::pointer(named("Leaf")))],
            ))
            .with_type(TypeDecl::record("Leaf", vec![Member::new("Value", RawType::basic("string"))]));
        let config = ProcessorConfig {
            max_depth: 2,
            ..ProcessorConfig::default()
        };

        with_resolver(vec![pkg], config, |r| {
            let deep = r.resolve(&named("Deep"), 0);
            let shallow = r.resolve(&named("Shallow"), 0);
            let registry = r.registry();

            let middle = registry[deep].fields[0].type_ref;
            let truncated = registry[middle].fields[0].type_ref;
            let TypeKind::Pointer { underlying } = registry[truncated].kind else {
                panic!("expected pointer");
            };
            assert_eq!(registry[underlying].kind, TypeKind::Unknown);
            assert!(!registry.is_registered(truncated));

            let pointer = registry[shallow].fields[0].type_ref;
            assert_ne!(pointer, truncated);
            let TypeKind::Pointer { underlying } = registry[pointer].kind else {
                panic!("expected pointer");
            };
            assert_eq!(registry[underlying].kind, TypeKind::Record);
            assert_eq!(registry.lookup("example.com/api/v1.Leaf"), Some(underlying));
            assert_eq!(registry.lookup("*example.com/api/v1.Leaf"), Some(pointer));
            assert!(r.references().parents(underlying).unwrap().contains(&shallow));
        });
    }

    #[test]
    fn excluded_type_resolves_to_stub() {
        let pkg = Package::new(PKG, "v1")
            .with_type(TypeDecl::record("Secret", vec![Member::new("Key", RawType::basic("string"))]));
        let config = ProcessorConfig {
            ignore_types: vec!["Secret$".into()],
            ..ProcessorConfig::default()
        };

        with_resolver(vec![pkg], config, |r| {
            let id = r.resolve(&RawType::pointer(named("Secret")), 0);
            let registry = r.registry();
            let TypeKind::Pointer { underlying } = registry[id].kind else {
                panic!("expected pointer");
            };
            assert_eq!(registry[underlying].kind, TypeKind::Unknown);
            assert_eq!(registry[underlying].name, "Secret");
            assert!(registry[underlying].fields.is_empty());
            assert_eq!(r.diagnostics()[0].kind, DiagnosticKind::Excluded);
        });
    }

    #[test]
    fn string_alias_collects_enum_values() {
        let pkg = Package::new(PKG, "v1")
            .with_type(TypeDecl::alias("Phase", RawType::basic("string")))
            .with_constant(ConstDecl::literal("Pending", "Phase", "\"Pending\"").with_doc("Waiting."))
            .with_constant(ConstDecl::literal("Running", "Phase", "`Running`"))
            .with_constant(ConstDecl {
                name: "Computed".into(),
                type_name: Some("Phase".into()),
                values: vec![ConstExpr::Expr("prefix + \"x\"".into())],
                doc: String::new(),
            })
            .with_constant(ConstDecl::literal("Other", "Mode", "\"Other\""));

        with_resolver(vec![pkg], ProcessorConfig::default(), |r| {
            let id = r.resolve(&named("Phase"), 0);
            let node = &r.registry()[id];
            assert!(node.kind.is_alias());
            assert_eq!(
                node.enum_values,
                vec![
                    EnumValue { name: "Pending".into(), doc: "Waiting.".into() },
                    EnumValue { name: "Running".into(), doc: String::new() },
                ]
            );
        });
    }

    #[test]
    fn anomalies_degrade_to_detached_nodes() {
        let pkg = Package::new(PKG, "v1");
        with_resolver(vec![pkg], ProcessorConfig::default(), |r| {
            let missing = r.resolve(&named("Missing"), 0);
            let iface = r.resolve(
                &RawType::Interface { methods: vec!["Run()".into()] },
                0,
            );
            let anon = r.resolve(&RawType::record(vec![]), 0);
            let any = r.resolve(&RawType::empty_interface(), 0);
            let foreign = r.resolve(&RawType::named("example.com/other", "Thing"), 0);

            let registry = r.registry();
            assert_eq!(registry[missing].kind, TypeKind::Unknown);
            assert_eq!(registry[iface].kind, TypeKind::Unsupported);
            assert_eq!(registry[anon].kind, TypeKind::Unsupported);
            assert_eq!(registry[any].kind, TypeKind::Interface);
            assert!(registry.is_registered(any));
            assert_eq!(registry[foreign].kind, TypeKind::Unknown);
            assert!(!registry.is_registered(foreign));

            let reasons: Vec<&DiagnosticKind> = r.diagnostics().iter().map(|d| &d.kind).collect();
            assert_eq!(
                reasons,
                vec![
                    &DiagnosticKind::NotFound,
                    &DiagnosticKind::UnsupportedInterface,
                    &DiagnosticKind::AnonymousRecord,
                    &DiagnosticKind::PackageNotLoaded {
                        package: "example.com/other".into()
                    },
                ]
            );
        });
    }

    #[test]
    fn maps_are_not_memoized() {
        let pkg = Package::new(PKG, "v1").with_type(TypeDecl::record("Item", vec![]));
        with_resolver(vec![pkg], ProcessorConfig::default(), |r| {
            let ty = RawType::map(RawType::basic("string"), named("Item"));
            let first = r.resolve(&ty, 0);
            let second = r.resolve(&ty, 0);
            assert_ne!(first, second);

            let registry = r.registry();
            assert_eq!(registry[first].package, PKG);
            assert_eq!(registry[first].name, "map[string]Item");
            assert_eq!(registry.type_string(first), "map[string]example.com/api/v1.Item");
        });
    }
}
