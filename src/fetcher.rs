use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::utils::error::{AppError, Result};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Plain HTTP page fetcher that presents itself as a desktop browser.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// GET a page and return its body. Anything but HTTP 200 is an error so the
    /// caller can decide what "no data" means for it.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        if url.is_empty() {
            return Err(AppError::Fetch("empty URL".to_string()));
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
