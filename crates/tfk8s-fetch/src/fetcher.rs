//! Download sources and write their CRDs to disk
//!
//! ```text
//! sources ──► normalize_url ──► GET (N at a time) ──► extract_crds ──► <out>/<group>/<plural>.yaml
//! ```

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Source;
use crate::error::{FetchError, Result};
use crate::extract::{ExtractedCrd, extract_crds};
use crate::http::HttpClient;
use crate::source::normalize_url;

/// Default number of concurrent downloads
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Result of writing one CRD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing file already had the same content
    Unchanged,
}

/// A source that could not be fetched
#[derive(Debug)]
pub struct FailedSource {
    pub source: String,
    pub error: FetchError,
}

/// Summary of a fetch run
#[derive(Debug, Default)]
pub struct FetchReport {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub failed: Vec<FailedSource>,
}

impl FetchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_crds(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }
}

/// CRD fetcher
pub struct Fetcher {
    client: HttpClient,
    output_dir: PathBuf,
    concurrency: usize,
}

impl Fetcher {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            output_dir: output_dir.into(),
            concurrency: DEFAULT_CONCURRENCY,
        })
    }

    /// Set the number of concurrent downloads (at least one)
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Download one source and extract its CRDs
    pub async fn fetch_source(&self, source: &Source) -> Result<Vec<ExtractedCrd>> {
        let url = normalize_url(&source.url)?;
        let text = self.client.get_text(&url).await?;
        let crds = extract_crds(&text, source)?;

        if crds.is_empty() {
            tracing::warn!(source = source.display_name(), "no CRDs found");
        }
        Ok(crds)
    }

    /// Write a CRD under the output directory, skipping identical files
    ///
    /// CRDs whose group or plural cannot be used as a path segment are refused.
    pub fn write_crd(&self, crd: &ExtractedCrd) -> Result<(PathBuf, WriteOutcome)> {
        let errors = crd.path_errors();
        if !errors.is_empty() {
            return Err(FetchError::InvalidDocument {
                source_url: crd.name.clone(),
                message: errors.join("; "),
            });
        }

        let path = self.output_dir.join(crd.relative_path());

        if std::fs::read_to_string(&path).is_ok_and(|existing| existing == crd.content) {
            return Ok((path, WriteOutcome::Unchanged));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &crd.content)?;
        Ok((path, WriteOutcome::Written))
    }

    /// Fetch every source and write the CRDs
    ///
    /// A failing source is recorded in the report and does not stop the run.
    /// `on_source` is called once per finished source.
    pub async fn fetch_all<F>(&self, sources: &[Source], on_source: F) -> FetchReport
    where
        F: Fn(&Source),
    {
        let mut report = FetchReport::default();
        let mut seen = HashSet::new();

        let mut results = stream::iter(sources)
            .map(|source| async move { (source, self.fetch_source(source).await) })
            .buffer_unordered(self.concurrency);

        while let Some((source, result)) = results.next().await {
            on_source(source);

            let crds = match result {
                Ok(crds) => crds,
                Err(error) => {
                    tracing::warn!(source = source.display_name(), error = %error, "fetch failed");
                    report.failed.push(FailedSource {
                        source: source.display_name().to_string(),
                        error,
                    });
                    continue;
                }
            };

            for crd in crds {
                if !seen.insert(crd.name.clone()) {
                    tracing::warn!(crd = %crd.name, source = source.display_name(), "CRD provided by more than one source");
                }

                match self.write_crd(&crd) {
                    Ok((path, WriteOutcome::Written)) => report.written.push(path),
                    Ok((path, WriteOutcome::Unchanged)) => report.unchanged.push(path),
                    Err(error) => report.failed.push(FailedSource {
                        source: source.display_name().to_string(),
                        error,
                    }),
                }
            }
        }

        report.written.sort();
        report.unchanged.sort();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CRDS: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: certificates.cert-manager.io
spec:
  group: cert-manager.io
  names:
    kind: Certificate
    plural: certificates
---
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: issuers.cert-manager.io
spec:
  group: cert-manager.io
  names:
    kind: Issuer
    plural: issuers
"#;

    async fn server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cert-manager.yaml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CRDS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing.yaml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let server = server().await;
        let out = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(out.path()).unwrap().with_concurrency(2);

        let sources = vec![
            Source::new(format!("{}/cert-manager.yaml", server.uri())),
            Source::new(format!("{}/missing.yaml", server.uri())),
        ];

        let finished = AtomicUsize::new(0);
        let report = fetcher
            .fetch_all(&sources, |_| {
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(finished.load(Ordering::SeqCst), 2);
        assert_eq!(
            report.written,
            vec![
                out.path().join("cert-manager.io/certificates.yaml"),
                out.path().join("cert-manager.io/issuers.yaml"),
            ]
        );
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0].error,
            FetchError::HttpError { status: 404, .. }
        ));
        assert!(!report.is_success());

        let written =
            std::fs::read_to_string(out.path().join("cert-manager.io/issuers.yaml")).unwrap();
        assert!(written.contains("kind: Issuer"));
    }

    #[tokio::test]
    async fn test_second_run_unchanged() {
        let server = server().await;
        let out = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(out.path()).unwrap();
        let sources = vec![Source::new(format!("{}/cert-manager.yaml", server.uri()))];

        let first = fetcher.fetch_all(&sources, |_| {}).await;
        assert_eq!(first.written.len(), 2);

        let second = fetcher.fetch_all(&sources, |_| {}).await;
        assert!(second.written.is_empty());
        assert_eq!(second.unchanged.len(), 2);
        assert_eq!(second.total_crds(), 2);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_source() {
        let out = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(out.path()).unwrap();

        let report = fetcher
            .fetch_all(&[Source::new("ftp://example.com/crds.yaml")], |_| {})
            .await;
        assert!(matches!(
            report.failed[0].error,
            FetchError::InvalidUrl { .. }
        ));
    }

    #[test]
    fn test_write_refuses_paths_outside_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let fetcher = Fetcher::new(&out).unwrap();

        for group in ["../escaped", "/abs"] {
            let crd = ExtractedCrd {
                name: "pwned.example".to_string(),
                group: group.to_string(),
                kind: "Pwned".to_string(),
                plural: "pwned".to_string(),
                content: "kind: CustomResourceDefinition\n".to_string(),
            };

            let err = fetcher.write_crd(&crd).unwrap_err();
            assert!(matches!(err, FetchError::InvalidDocument { .. }));
        }

        assert!(!dir.path().join("escaped/pwned.yaml").exists());
        assert!(!std::path::Path::new("/abs/pwned.yaml").exists());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_fetch_skips_escaping_crd() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/evil.yaml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "kind: CustomResourceDefinition\nmetadata:\n  name: pwned.escaped\nspec:\n  group: ../escaped\n  names:\n    kind: Pwned\n    plural: pwned\n",
            ))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(dir.path().join("out")).unwrap();
        let report = fetcher
            .fetch_all(&[Source::new(format!("{}/evil.yaml", server.uri()))], |_| {})
            .await;

        assert!(report.written.is_empty());
        assert!(!dir.path().join("escaped/pwned.yaml").exists());
    }

    #[test]
    fn test_concurrency_at_least_one() {
        let fetcher = Fetcher::new("out").unwrap().with_concurrency(0);
        assert_eq!(fetcher.concurrency, 1);
        assert_eq!(fetcher.output_dir(), Path::new("out"));
    }
}
