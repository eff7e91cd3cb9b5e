//! Source configuration
//!
//! Stored in `~/.config/tfk8s/sources.yaml`:
//!
//! ```yaml
//! sources:
//!   - url: https://github.com/cert-manager/cert-manager/blob/master/deploy/crds/crd-certificates.yaml
//!   - name: prometheus-operator
//!     url: https://github.com/prometheus-operator/prometheus-operator/releases/download/v0.75.0/stripped-down-crds.yaml
//!     include: [ServiceMonitor, PodMonitor]
//!     exclude: [alertmanagers.monitoring.coreos.com]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};

/// Sources configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl SourcesConfig {
    /// Load configuration from the default location
    ///
    /// A missing file yields an empty configuration.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| FetchError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("tfk8s").join("sources.yaml"))
    }

    fn validate(&self) -> Result<()> {
        if let Some(source) = self.sources.iter().find(|s| s.url.trim().is_empty()) {
            return Err(FetchError::InvalidConfig {
                message: format!(
                    "source '{}' has an empty url",
                    source.name.as_deref().unwrap_or("<unnamed>")
                ),
            });
        }
        Ok(())
    }
}

/// One upstream location of CRD definitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// GitHub/GitLab blob URL or any raw http(s) URL
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Only keep CRDs of these kinds (all when empty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Drop CRDs with these names (e.g. `alertmanagers.monitoring.coreos.com`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl Source {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Name used in logs and reports
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    /// Check a CRD against the include/exclude filters
    pub fn accepts(&self, kind: &str, crd_name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|k| k == kind);
        included && !self.exclude.iter().any(|n| n == crd_name)
    }
}
