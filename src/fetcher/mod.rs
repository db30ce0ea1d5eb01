pub mod config;
pub mod http_fetcher;

pub use config::FetcherConfig;
pub use http_fetcher::HttpFetcher;

use async_trait::async_trait;

use crate::app::Result;

#[async_trait]
pub trait Fetcher {
    /// Fetch the raw body at `url`.
    ///
    /// Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
