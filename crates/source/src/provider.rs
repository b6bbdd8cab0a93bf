use crate::error::{Result, SourceError};
use crate::facts::{Package, TypeDecl};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Read-only access to resolved type facts
pub trait TypeInfoProvider {
    /// Every loaded package, ordered by path
    fn packages(&self) -> &[Package];

    fn package(&self, path: &str) -> Option<&Package> {
        self.packages().iter().find(|pkg| pkg.path == path)
    }

    /// Declaration of `name` in package `path`
    fn lookup_type(&self, path: &str, name: &str) -> Option<(&Package, &TypeDecl)> {
        let pkg = self.package(path)?;
        pkg.type_decl(name).map(|decl| (pkg, decl))
    }
}

/// In-memory set of packages
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    packages: Vec<Package>,
}

impl SourceSet {
    /// Build a set from packages, rejecting duplicate paths
    pub fn new(mut packages: Vec<Package>) -> Result<Self> {
        let mut seen = HashSet::new();
        for pkg in &packages {
            if !seen.insert(pkg.path.as_str()) {
                return Err(SourceError::DuplicatePackage(pkg.path.clone()));
            }
        }
        packages.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Self { packages })
    }

    /// Load every `*.json` file under `root`, one package per file
    pub fn load_dir(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(SourceError::NotADirectory(root.to_path_buf()));
        }

        let mut packages = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some("json")
            {
                continue;
            }

            log::debug!("Loading package facts from {}", path.display());
            let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let package: Package =
                serde_json::from_str(&content).map_err(|source| SourceError::Json {
                    path: path.to_path_buf(),
                    source,
                })?;
            packages.push(package);
        }

        log::info!("Loaded {} packages from {}", packages.len(), root.display());
        Self::new(packages)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl TypeInfoProvider for SourceSet {
    fn packages(&self) -> &[Package] {
        &self.packages
    }
}
