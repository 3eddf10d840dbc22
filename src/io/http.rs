use async_trait::async_trait;
use reqwest::Client;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::{FetchOptions, IndexSource};
use anyhow::{Result, bail};

/// Index archive served over HTTP(S)
pub struct HttpIndexSource {
    client: Client,
    url: String,
    transferred_bytes: AtomicU64,
    max_retry: u32,
}

impl HttpIndexSource {
    pub fn new(url: String, options: FetchOptions) -> Result<Self> {
        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client,
            url,
            transferred_bytes: AtomicU64::new(0),
            max_retry: options.max_retry,
        })
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    fn location(&self) -> &str {
        &self.url
    }

    fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }

    async fn open(&self) -> Result<Box<dyn Read + Send>> {
        let mut retry_count = 0;

        loop {
            let result = match self.client.get(&self.url).send().await {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        bail!(
                            "HTTP request for {} failed with status: {}",
                            self.url,
                            resp.status()
                        );
                    }
                    resp.bytes().await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(body) => {
                    self.transferred_bytes
                        .fetch_add(body.len() as u64, Ordering::Relaxed);
                    debug!(url = %self.url, bytes = body.len(), "fetched index");
                    return Ok(Box::new(Cursor::new(body)));
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        bail!("Max retries exceeded fetching {}: {}", self.url, e);
                    }
                    warn!(
                        "Connection error, retry {}/{}: {}",
                        retry_count, self.max_retry, e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
