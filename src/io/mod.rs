mod http;
mod local;

pub use http::HttpIndexSource;
pub use local::LocalIndexSource;

use anyhow::Result;
use async_trait::async_trait;
use std::io::Read;
use std::time::Duration;

/// Trait for a location an index archive can be read from
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Where the archive lives (URL or path), for messages
    fn location(&self) -> &str;

    /// Open a fresh reader over the compressed archive bytes
    async fn open(&self) -> Result<Box<dyn Read + Send>>;

    /// Bytes pulled over the network so far
    fn transferred_bytes(&self) -> u64 {
        0
    }
}

/// Transport settings for HTTP sources
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_retry: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retry: 10,
        }
    }
}

pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Pick the source implementation for `location`
pub fn open_source(location: &str, options: FetchOptions) -> Result<Box<dyn IndexSource>> {
    if is_http_url(location) {
        Ok(Box::new(HttpIndexSource::new(location.to_string(), options)?))
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        Ok(Box::new(LocalIndexSource::new(path)))
    }
}
