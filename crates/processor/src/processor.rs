use crate::compiled::CompiledConfig;
use crate::config::{MarkerTarget, ProcessorConfig};
use crate::docs::package_doc;
use crate::error::{ProcessorError, Result};
use crate::inline::inline_types;
use crate::marker_registry::{
    MarkerRegistry, GROUP_NAME_MARKER, OBJECT_ROOT_MARKER, VERSION_NAME_MARKER,
};
use crate::markers::{apply_markers, propagate_markers};
use crate::resolver::Resolver;
use refdoc_model::{
    display_value, ApiModel, GroupVersion, GroupVersionDetails, TypeId, TypeKind, TypeRegistry,
};
use refdoc_source::{Package, RawType, TypeInfoProvider};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
struct GroupVersionInfo {
    doc: String,
    kinds: BTreeSet<String>,
    /// Declared name → node
    types: BTreeMap<String, TypeId>,
}

/// Build the documented type graph of every group-bearing package.
///
/// Configuration errors abort before any resolution; resolution anomalies
/// are recorded in [`ApiModel::diagnostics`].
pub fn process(provider: &dyn TypeInfoProvider, config: &ProcessorConfig) -> Result<ApiModel> {
    let compiled = CompiledConfig::compile(config)?;
    let markers = MarkerRegistry::new(&config.custom_markers)?;
    let mut resolver = Resolver::new(provider, &compiled, &markers, config.max_depth);

    let group_versions = find_api_types(&mut resolver, provider);

    let (mut registry, mut references, mut diagnostics) = resolver.into_parts();
    let report = inline_types(
        &mut registry,
        &mut references,
        config.max_inline_iterations,
        &mut diagnostics,
    );
    log::debug!(
        "Inlined {} fields in {} iterations",
        report.spliced,
        report.iterations
    );
    propagate_markers(&mut registry);
    apply_markers(&mut registry);

    references.attach(&mut registry)?;
    let groups = assemble(&registry, &compiled, group_versions)?;

    log::info!(
        "Processed {} group versions, {} types, {} diagnostics",
        groups.len(),
        registry.registered_count(),
        diagnostics.len()
    );

    Ok(ApiModel {
        types: registry,
        groups,
        diagnostics,
    })
}

/// Resolve the exported types of every group-bearing package
fn find_api_types(
    resolver: &mut Resolver<'_>,
    provider: &dyn TypeInfoProvider,
) -> BTreeMap<GroupVersion, GroupVersionInfo> {
    let mut group_versions: BTreeMap<GroupVersion, GroupVersionInfo> = BTreeMap::new();

    for pkg in provider.packages() {
        let Some(group_version) = extract_group_version(resolver.markers, pkg) else {
            continue;
        };

        if resolver
            .config
            .should_ignore_group_version(&group_version.to_string())
        {
            log::debug!("Skipping excluded group version {group_version}");
            continue;
        }

        log::debug!("Found group version {group_version} in {}", pkg.path);
        let mut kinds = Vec::new();
        let mut types = Vec::new();
        for decl in &pkg.types {
            let identifier = format!("{}.{}", pkg.path, decl.name);
            if resolver.config.should_ignore_type(&identifier) {
                log::debug!("Skipping excluded type {identifier}");
                continue;
            }
            if !decl.exported {
                continue;
            }

            let id = resolver.resolve(&RawType::named(&pkg.path, &decl.name), 0);
            if resolver.registry[id].kind != TypeKind::Basic {
                types.push((decl.name.clone(), id));
            }

            if decl.markers.contains(OBJECT_ROOT_MARKER) {
                resolver.registry[id].root_kind = Some(group_version.with_kind(&decl.name));
                kinds.push(decl.name.clone());
            }
        }

        let info = group_versions
            .entry(group_version)
            .or_insert_with(|| GroupVersionInfo {
                doc: package_doc(&pkg.doc),
                ..GroupVersionInfo::default()
            });
        info.kinds.extend(kinds);
        info.types.extend(types);
    }

    group_versions
}

fn extract_group_version(markers: &MarkerRegistry, pkg: &Package) -> Option<GroupVersion> {
    let values = markers.filter(MarkerTarget::Package, &pkg.markers);
    let group = display_value(values.get(GROUP_NAME_MARKER)?);
    let version = values
        .get(VERSION_NAME_MARKER)
        .map_or_else(|| pkg.name.clone(), display_value);
    Some(GroupVersion::new(group, version))
}

/// Final per group/version listings, ordered by group then version
fn assemble(
    registry: &TypeRegistry,
    config: &CompiledConfig,
    group_versions: BTreeMap<GroupVersion, GroupVersionInfo>,
) -> Result<Vec<GroupVersionDetails>> {
    let mut groups = Vec::with_capacity(group_versions.len());
    for (group_version, info) in group_versions {
        let mut types = BTreeMap::new();
        for (name, id) in info.types {
            let identifier = registry[id].identifier();
            if config.should_ignore_type(&identifier) {
                log::debug!("Skipping excluded type {name}");
                continue;
            }

            let loaded = registry
                .lookup(&identifier)
                .ok_or_else(|| ProcessorError::TypeNotLoaded(identifier.clone()))?;
            types.insert(name, loaded);
        }

        groups.push(GroupVersionDetails {
            group_version,
            doc: info.doc,
            kinds: info.kinds.into_iter().collect(),
            types,
        });
    }
    Ok(groups)
}
