//! Shared utility functions for CLI commands

use std::path::Path;
use tfk8s_core::Value;
use tfk8s_kube::Catalog;

use crate::error::{CliError, Result};

/// Load the CRD catalog from a file or directory
///
/// An empty catalog is an error: every command needs at least one type.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(CliError::Io {
            message: format!("CRD path {} does not exist", path.display()),
        });
    }

    let catalog = Catalog::load(path)?;
    if catalog.is_empty() {
        return Err(CliError::validation_with_help(
            format!("no CustomResourceDefinitions found in {}", path.display()),
            "Run `tfk8s fetch` to download CRDs from the configured sources",
        ));
    }

    tracing::debug!(crds = catalog.crds().len(), path = %path.display(), "catalog loaded");
    Ok(catalog)
}

/// Load a configuration file (YAML or JSON)
pub fn load_config(path: &Path) -> Result<Value> {
    Value::from_file(path).map_err(|e| match e {
        tfk8s_core::CoreError::Io(io) => CliError::Io {
            message: format!("{}: {}", path.display(), io),
        },
        e => CliError::validation(format!("{}: {}", path.display(), e)),
    })
}
