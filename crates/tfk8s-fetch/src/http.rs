//! HTTP download client

use url::Url;

use crate::error::{FetchError, Result};

/// Request timeout in seconds
pub const TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = "tfk8s-fetcher";

/// Plain HTTP(S) client for public sources
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Download a URL as text
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        tracing::debug!(url = %url, "downloading");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited { retry_after });
        }

        if !status.is_success() {
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                message: format!("Request to {} failed", url),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[tokio::test]
    async fn test_get_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/crds.yaml"))
            .and(header("user-agent", "tfk8s-fetcher"))
            .respond_with(ResponseTemplate::new(200).set_body_string("kind: List\n"))
            .mount(&server)
            .await;

        let text = HttpClient::new()
            .unwrap()
            .get_text(&url(&server, "/crds.yaml"))
            .await
            .unwrap();
        assert_eq!(text, "kind: List\n");
    }

    #[tokio::test]
    async fn test_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = HttpClient::new()
            .unwrap()
            .get_text(&url(&server, "/missing.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let err = HttpClient::new()
            .unwrap()
            .get_text(&url(&server, "/crds.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::RateLimited { retry_after: 7 }));
    }
}
