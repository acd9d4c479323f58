use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout applied to every source download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can turn a URL into document text.
///
/// Retrieval jobs only talk to this trait, so tests can substitute a fake
/// source and count or fail requests without a network.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Download the document at `url`. Exactly one attempt is made.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// HTTP client for downloading documentation indexes
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with the default request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a new fetcher with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sfref/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentSource for Fetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching source document");
        let response = self.client.get(url).send().await.map_err(|e| map_send_error(url, e))?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await.map_err(|e| map_send_error(url, e))?;
        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

fn map_send_error(url: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("request to '{url}' timed out"))
    } else {
        Error::Network(err)
    }
}

// Note: Default is not implemented as Fetcher::new() can fail.
// Use Fetcher::new() directly and handle the Result.
