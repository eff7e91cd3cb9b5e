//! Types command - list the resource types generated from CRDs

use console::style;
use miette::IntoDiagnostic;
use serde_json::json;
use std::path::Path;
use tfk8s_kube::{CrdScope, ResourceFlavor};

use crate::error::Result;
use crate::util::load_catalog;

pub fn run(crds: &Path, json_output: bool) -> Result<()> {
    let catalog = load_catalog(crds)?;

    if json_output {
        let types: Vec<_> = catalog
            .types()
            .map(|t| {
                json!({
                    "name": t.name(),
                    "manifest": t.with_flavor(ResourceFlavor::Manifest).name(),
                    "api_version": t.api_version(),
                    "kind": t.kind(),
                    "namespaced": t.is_namespaced(),
                    "short_names": t.crd.names.short_names,
                    "storage": t.version.storage,
                    "deprecated": t.version.deprecated,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&types).into_diagnostic()?);
        return Ok(());
    }

    for t in catalog.types() {
        let scope = match t.crd.scope {
            CrdScope::Namespaced => style("namespaced").yellow(),
            CrdScope::Cluster => style("cluster").magenta(),
        };
        let deprecated = if t.version.deprecated {
            format!(" {}", style("(deprecated)").red())
        } else {
            String::new()
        };

        println!(
            "{} {}/{} {}{}",
            style(t.name()).cyan().bold(),
            t.api_version(),
            t.kind(),
            scope,
            deprecated
        );
        println!("    resource, data source");
        println!(
            "    {} (manifest)",
            t.with_flavor(ResourceFlavor::Manifest).name()
        );
    }

    Ok(())
}
