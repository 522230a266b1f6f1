use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::html::html_to_text;
use crate::retry::RetryPolicy;

/// Pages yielding less text than this are treated as having no policy.
pub const MIN_POLICY_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("no policy text found at {0}")]
    NoContent(String),
}

impl FetchError {
    /// Transport failures, 5xx and 429 are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request(e) => !e.is_builder(),
            FetchError::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::InvalidUrl(_) | FetchError::NoContent(_) => false,
        }
    }
}

/// Turns a URL into normalized plain policy text.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(retry: RetryPolicy, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("privacy-analyzer/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, retry })
    }

    /// Validate that `url` is an absolute http(s) URL.
    pub fn parse_url(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(FetchError::InvalidUrl(format!("unsupported scheme '{other}'"))),
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Self::parse_url(url)?;

        let body = self
            .retry
            .retry("fetch_policy", FetchError::is_retryable, || self.fetch_once(&parsed))
            .await?;
        debug!(url = %parsed, bytes = body.len(), "Fetched policy page");

        let text = html_to_text(&body);
        if text.chars().count() < MIN_POLICY_CHARS {
            return Err(FetchError::NoContent(parsed.to_string()));
        }

        info!(url = %parsed, chars = text.chars().count(), "Extracted policy text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(RetryPolicy::new(1, 1, 1), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_and_strips_html() {
        let server = MockServer::start().await;
        let body = format!(
            "<html><body><h1>Privacy</h1><p>{}</p></body></html>",
            "We collect your email address to provide the service. ".repeat(3)
        );
        Mock::given(method("GET"))
            .and(path("/privacy"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let text = fetcher()
            .fetch(&format!("{}/privacy", server.uri()))
            .await
            .unwrap();

        assert!(text.starts_with("Privacy\nWe collect your email address"));
        assert!(!text.contains('<'));
    }

    #[tokio::test]
    async fn test_retries_then_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let err = fetcher().fetch(&server.uri()).await.unwrap_err();

        assert!(matches!(err, FetchError::Status(StatusCode::SERVICE_UNAVAILABLE)));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(RetryPolicy::new(3, 1, 1), Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();

        assert!(matches!(err, FetchError::Status(StatusCode::NOT_FOUND)));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE).is_retryable());
        assert!(FetchError::Status(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!FetchError::Status(StatusCode::NOT_FOUND).is_retryable());
        assert!(!FetchError::Status(StatusCode::FORBIDDEN).is_retryable());
        assert!(!FetchError::NoContent("https://example.com".into()).is_retryable());
        assert!(!FetchError::InvalidUrl("x".into()).is_retryable());
    }

    #[tokio::test]
    async fn test_short_page_has_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Hi</p>"))
            .mount(&server)
            .await;

        let err = fetcher().fetch(&server.uri()).await.unwrap_err();

        assert!(matches!(err, FetchError::NoContent(_)));
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(HttpFetcher::parse_url("ftp://example.com/policy").is_err());
        assert!(HttpFetcher::parse_url("not a url").is_err());
        assert!(HttpFetcher::parse_url("https://example.com/privacy").is_ok());
    }
}
