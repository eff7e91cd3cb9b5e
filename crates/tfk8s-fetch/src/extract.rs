//! CRD extraction from downloaded YAML

use serde_json::Value;
use std::path::PathBuf;
use tfk8s_core::k8s::{is_dns1123_label, is_dns1123_subdomain};

use crate::config::Source;
use crate::error::Result;
use crate::split::split_documents;

const CRD_KIND: &str = "CustomResourceDefinition";

/// A single CRD found in a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCrd {
    /// CRD name (e.g., "certificates.cert-manager.io")
    pub name: String,
    pub group: String,
    pub kind: String,
    pub plural: String,
    /// YAML document, newline terminated
    pub content: String,
}

impl ExtractedCrd {
    /// Output location relative to the output directory: `<group>/<plural>.yaml`
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.group).join(format!("{}.yaml", self.plural))
    }

    /// Problems that keep `group` and `plural` from being used as path segments
    ///
    /// The group must be a DNS-1123 subdomain and the plural a DNS-1123 label,
    /// which rules out separators, `..` and absolute paths.
    pub fn path_errors(&self) -> Vec<String> {
        let group = is_dns1123_subdomain(&self.group)
            .into_iter()
            .map(|e| format!("spec.group '{}': {}", self.group, e));
        let plural = is_dns1123_label(&self.plural)
            .into_iter()
            .map(|e| format!("spec.names.plural '{}': {}", self.plural, e));
        group.chain(plural).collect()
    }

    fn from_document(value: &Value, content: String) -> Option<Self> {
        let name = value.get("metadata")?.get("name")?.as_str()?;
        let spec = value.get("spec")?;
        let names = spec.get("names")?;

        Some(Self {
            name: name.to_string(),
            group: spec.get("group")?.as_str()?.to_string(),
            kind: names.get("kind")?.as_str()?.to_string(),
            plural: names.get("plural")?.as_str()?.to_string(),
            content,
        })
    }
}

/// Extract every CRD accepted by a source's filters
///
/// Documents that cannot be parsed or lack the naming fields are skipped with
/// a warning. `kind: List` documents are expanded.
pub fn extract_crds(text: &str, source: &Source) -> Result<Vec<ExtractedCrd>> {
    let mut crds = Vec::new();

    for document in split_documents(text) {
        let value: Value = match serde_yaml::from_str(&document) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(source = source.display_name(), error = %e, "skipping unparsable document");
                continue;
            }
        };

        match value.get("kind").and_then(Value::as_str) {
            Some(CRD_KIND) => {
                let content = format!("{}\n", document.trim_start_matches('\n').trim_end());
                push_crd(&mut crds, source, &value, content);
            }
            Some("List") => {
                let items = value.get("items").and_then(Value::as_array);
                for item in items.into_iter().flatten() {
                    if item.get("kind").and_then(Value::as_str) == Some(CRD_KIND) {
                        let content = serde_yaml::to_string(item)?;
                        push_crd(&mut crds, source, item, content);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(crds)
}

fn push_crd(crds: &mut Vec<ExtractedCrd>, source: &Source, value: &Value, content: String) {
    let Some(crd) = ExtractedCrd::from_document(value, content) else {
        tracing::warn!(
            source = source.display_name(),
            "skipping CRD without metadata.name, spec.group or spec.names"
        );
        return;
    };

    let errors = crd.path_errors();
    if !errors.is_empty() {
        tracing::warn!(
            source = source.display_name(),
            crd = %crd.name,
            errors = %errors.join("; "),
            "skipping CRD with invalid group or plural"
        );
        return;
    }

    if source.accepts(&crd.kind, &crd.name) {
        crds.push(crd);
    } else {
        tracing::debug!(source = source.display_name(), crd = %crd.name, "filtered out");
    }
}
