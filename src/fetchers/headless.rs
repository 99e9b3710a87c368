use super::DocumentFetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const ENDPOINT_ENV: &str = "PAGE_SCRIBER_URL";

#[derive(Serialize)]
struct ContentRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: String,
}

/// Fetches pages through a headless-browser rendering service, for sites
/// whose markup is only complete after scripts run.
pub struct HeadlessFetcher {
    endpoint: String,
    client: Client,
}

impl HeadlessFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let endpoint = format!("{}/api/fetch-content", base_url.trim_end_matches('/'));
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    /// Builds a fetcher from `PAGE_SCRIBER_URL` when it is set.
    pub fn from_env(timeout: Duration) -> Option<Result<Self, FetchError>> {
        let base_url = env::var(ENDPOINT_ENV).ok()?;
        Some(Self::new(&base_url, timeout))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentFetcher for HeadlessFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ContentRequest { url })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Headless(format!(
                "rendering service responded with status {}",
                response.status()
            )));
        }

        let content: ContentResponse = response.json().await?;
        Ok(content.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_fetch_posts_url_and_returns_content() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/fetch-content")
            .match_body(Matcher::Json(
                serde_json::json!({"url": "https://example.com/r"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": "<html>rendered</html>"}"#)
            .create_async()
            .await;

        let fetcher = HeadlessFetcher::new(&format!("{}/", server.url()), Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            fetcher.endpoint(),
            format!("{}/api/fetch-content", server.url())
        );
        let content = fetcher.fetch("https://example.com/r").await.unwrap();
        assert_eq!(content, "<html>rendered</html>");
    }

    #[tokio::test]
    async fn test_service_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/fetch-content")
            .with_status(502)
            .create_async()
            .await;

        let fetcher = HeadlessFetcher::new(&server.url(), Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch("https://example.com/r").await.unwrap_err();
        assert!(matches!(err, FetchError::Headless(_)));
    }
}
