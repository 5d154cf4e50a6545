use std::path::Path;
use std::time::Duration;

use log::warn;

use crate::error::{Error, Result};

const MAX_ATTEMPTS: u32 = 6;

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    // Bounded retry with linearly increasing backoff: 0, 1, 2, 3, 4, 5
    // seconds before successive attempts. Exhaustion is an ordinary error;
    // callers skip the source and keep going.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_secs(attempt as u64)).await;
            }
            match self.try_fetch(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    warn!("attempt {}/{} failed for {}: {}", attempt + 1, MAX_ATTEMPTS, url, e);
                }
            }
        }
        Err(Error::FetchExhausted {
            url: url.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn fetch_to(&self, url: &str, path: &Path) -> Result<()> {
        let bytes = self.fetch(url).await?;
        tokio::fs::write(path, &bytes).await?;
        Ok(())
    }

    async fn try_fetch(&self, url: &str) -> reqwest::Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "color-harvest")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
