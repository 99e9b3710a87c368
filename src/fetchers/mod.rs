use crate::error::FetchError;
use async_trait::async_trait;

mod headless;
mod request;

pub use headless::HeadlessFetcher;
pub use request::RequestFetcher;

/// Retrieves the raw markup of a page.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
