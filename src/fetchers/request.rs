use super::DocumentFetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Plain HTTP GET of the page.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Whether `url` answers with a 2xx status. Transport errors count as
    /// unreachable.
    pub async fn probe_reachable(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Reachability probe for {} failed: {}", url, e);
                false
            }
        }
    }
}

#[async_trait]
impl DocumentFetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
