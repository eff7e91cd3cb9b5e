//! Catalog of resource types derived from CRDs
//!
//! Each served version of each loaded CRD contributes three type names:
//! the resource, the data source (same name) and the manifest data source
//! (`_manifest` suffix).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tfk8s_core::Schema;

use crate::client::ObjectRef;
use crate::crd::{CrdParser, CrdSchema, CrdVersionSchema};
use crate::error::{KubeError, Result};
use crate::generate::{ResourceFlavor, SchemaGenerator};
use crate::naming;

/// Index entry: which CRD version a type name refers to
#[derive(Debug, Clone, Copy)]
struct TypeIndex {
    crd: usize,
    version: usize,
}

/// A set of CRDs indexed by generated type name
#[derive(Debug, Default)]
pub struct Catalog {
    crds: Vec<CrdSchema>,
    types: BTreeMap<String, TypeIndex>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every CRD from a file or a directory tree
    ///
    /// Directories are walked recursively for `.yaml`, `.yml` and `.json`
    /// files, in sorted order.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut catalog = Self::new();

        for file in crd_files(path) {
            let content = std::fs::read_to_string(&file)?;
            let crds = CrdParser::parse_all(&content).map_err(|e| match e {
                KubeError::InvalidCrd(msg) => {
                    KubeError::InvalidCrd(format!("{}: {}", file.display(), msg))
                }
                other => other,
            })?;
            tracing::debug!(file = %file.display(), count = crds.len(), "loaded CRDs");
            for crd in crds {
                catalog.add(crd);
            }
        }

        Ok(catalog)
    }

    /// Build a catalog from already parsed CRDs
    pub fn from_crds(crds: impl IntoIterator<Item = CrdSchema>) -> Self {
        let mut catalog = Self::new();
        for crd in crds {
            catalog.add(crd);
        }
        catalog
    }

    /// Add a CRD, replacing any earlier CRD with the same name
    pub fn add(&mut self, crd: CrdSchema) {
        let index = match self.crds.iter().position(|c| c.name == crd.name) {
            Some(existing) => {
                tracing::warn!(crd = %crd.name, "duplicate CRD, keeping the last definition");
                self.types.retain(|_, t| t.crd != existing);
                self.crds[existing] = crd;
                existing
            }
            None => {
                self.crds.push(crd);
                self.crds.len() - 1
            }
        };

        let crd = &self.crds[index];
        for (v, version) in crd.versions.iter().enumerate() {
            if !version.served {
                continue;
            }
            let name = naming::type_name(&crd.group, &crd.names.kind, &version.name);
            if let Some(previous) = self.types.get(&name).filter(|t| t.crd != index) {
                tracing::warn!(
                    type_name = %name,
                    previous = %self.crds[previous.crd].name,
                    crd = %crd.name,
                    "type name collision, keeping the last definition"
                );
            }
            self.types.insert(name, TypeIndex { crd: index, version: v });
        }
    }

    pub fn crds(&self) -> &[CrdSchema] {
        &self.crds
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All resource types, sorted by name
    pub fn types(&self) -> impl Iterator<Item = ResourceType<'_>> {
        self.types
            .iter()
            .map(|(name, index)| self.entry(name, *index, ResourceFlavor::Resource))
    }

    /// Look up a type name
    ///
    /// Names ending in `_manifest` resolve to the manifest flavor; other names
    /// resolve to the resource flavor unless `data_source` is set.
    pub fn lookup(&self, type_name: &str, data_source: bool) -> Result<ResourceType<'_>> {
        if let Some(base) = type_name.strip_suffix(naming::MANIFEST_SUFFIX) {
            if let Some((name, index)) = self.types.get_key_value(base) {
                return Ok(self.entry(name, *index, ResourceFlavor::Manifest));
            }
        }

        let (name, index) = self
            .types
            .get_key_value(type_name)
            .ok_or_else(|| KubeError::UnknownType(type_name.to_string()))?;

        let flavor = if data_source {
            ResourceFlavor::DataSource
        } else {
            ResourceFlavor::Resource
        };
        Ok(self.entry(name, *index, flavor))
    }

    fn entry<'a>(&'a self, name: &'a str, index: TypeIndex, flavor: ResourceFlavor) -> ResourceType<'a> {
        let crd = &self.crds[index.crd];
        ResourceType {
            base_name: name,
            flavor,
            crd,
            version: &crd.versions[index.version],
        }
    }
}

fn crd_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase())
                    .is_some_and(|ext| matches!(ext.as_str(), "yaml" | "yml" | "json"))
        })
        .collect();

    files.sort();
    files
}

/// A generated type: one CRD version in one flavor
#[derive(Debug, Clone, Copy)]
pub struct ResourceType<'a> {
    base_name: &'a str,
    pub flavor: ResourceFlavor,
    pub crd: &'a CrdSchema,
    pub version: &'a CrdVersionSchema,
}

impl<'a> ResourceType<'a> {
    /// Type name, including the `_manifest` suffix for manifests
    pub fn name(&self) -> String {
        match self.flavor {
            ResourceFlavor::Manifest => format!("{}{}", self.base_name, naming::MANIFEST_SUFFIX),
            _ => self.base_name.to_string(),
        }
    }

    /// The same CRD version in another flavor
    pub fn with_flavor(self, flavor: ResourceFlavor) -> Self {
        Self { flavor, ..self }
    }

    pub fn api_version(&self) -> String {
        self.crd.api_version(&self.version.name)
    }

    pub fn kind(&self) -> &str {
        &self.crd.names.kind
    }

    pub fn is_namespaced(&self) -> bool {
        self.crd.is_namespaced()
    }

    /// Generate the attribute schema of this type
    pub fn schema(&self) -> Schema {
        SchemaGenerator::new(self.crd, self.version).generate(self.flavor)
    }

    /// Address an object of this type
    ///
    /// Namespaced types require a namespace; cluster-scoped types reject one.
    pub fn object_ref(&self, name: &str, namespace: Option<&str>) -> Result<ObjectRef> {
        let namespace = match (self.is_namespaced(), namespace) {
            (true, Some(ns)) => Some(ns.to_string()),
            (true, None) => {
                return Err(KubeError::InvalidScope(format!(
                    "{} is namespaced, a namespace is required",
                    self.kind()
                )));
            }
            (false, Some(ns)) => {
                return Err(KubeError::InvalidScope(format!(
                    "{} is cluster-scoped, namespace '{}' cannot be used",
                    self.kind(),
                    ns
                )));
            }
            (false, None) => None,
        };

        Ok(ObjectRef {
            api_version: self.api_version(),
            kind: self.kind().to_string(),
            plural: self.crd.names.plural.clone(),
            namespace,
            name: name.to_string(),
        })
    }
}
