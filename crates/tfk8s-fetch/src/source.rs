//! Source URL normalization
//!
//! Links copied from a browser point at HTML pages; downloads need the raw
//! file. GitHub `blob` links are rewritten to `raw.githubusercontent.com` and
//! GitLab `/-/blob/` links to `/-/raw/`. Anything else is used verbatim.

use url::Url;

use crate::error::{FetchError, Result};

/// Turn a source URL into the URL of the raw file
pub fn normalize_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.host_str() == Some("github.com") {
        if let Some(rewritten) = github_raw(&url)? {
            return Ok(rewritten);
        }
    }

    if url.path().contains("/-/blob/") {
        let mut rewritten = url.clone();
        rewritten.set_path(&url.path().replacen("/-/blob/", "/-/raw/", 1));
        return Ok(rewritten);
    }

    Ok(url)
}

/// `github.com/<owner>/<repo>/blob/<ref>/<path>` -> `raw.githubusercontent.com/<owner>/<repo>/<ref>/<path>`
fn github_raw(url: &Url) -> Result<Option<Url>> {
    let segments: Vec<&str> = url.path().trim_start_matches('/').split('/').collect();
    let [owner, repo, marker, rest @ ..] = segments.as_slice() else {
        return Ok(None);
    };
    if !matches!(*marker, "blob" | "raw") || rest.len() < 2 {
        return Ok(None);
    }

    let raw = format!(
        "https://raw.githubusercontent.com/{}/{}/{}",
        owner,
        repo,
        rest.join("/")
    );
    Ok(Some(Url::parse(&raw)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_blob() {
        let url = normalize_url(
            "https://github.com/cert-manager/cert-manager/blob/v1.15.0/deploy/crds/crd-certificates.yaml",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/cert-manager/cert-manager/v1.15.0/deploy/crds/crd-certificates.yaml"
        );
    }

    #[test]
    fn test_github_release_asset_untouched() {
        let raw = "https://github.com/prometheus-operator/prometheus-operator/releases/download/v0.75.0/stripped-down-crds.yaml";
        assert_eq!(normalize_url(raw).unwrap().as_str(), raw);
    }

    #[test]
    fn test_gitlab_blob() {
        let url = normalize_url("https://gitlab.com/group/project/-/blob/main/crds/crd.yaml").unwrap();
        assert_eq!(
            url.as_str(),
            "https://gitlab.com/group/project/-/raw/main/crds/crd.yaml"
        );
    }

    #[test]
    fn test_plain_url() {
        let raw = "https://example.com/crds/all.yaml?ref=main";
        assert_eq!(normalize_url(raw).unwrap().as_str(), raw);
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            normalize_url("file:///etc/passwd"),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(normalize_url("not a url").is_err());
    }
}
