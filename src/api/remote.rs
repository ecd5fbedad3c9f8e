use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, Response, StatusCode};

use crate::validate::{check_size, Limits};

/// Longest a server's `Retry-After` is honoured before retrying anyway.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Downloads input images from `http(s)` URLs.
pub struct RemoteFetcher {
    pub client: Client,
    pub limits: Limits,
    pub max_retry_delay: Duration,
}

/// Bytes fetched from a URL plus what the server said about them.
#[derive(Debug, Clone)]
pub struct RemoteImage {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl RemoteFetcher {
    pub fn new(limits: Limits, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            limits,
            max_retry_delay: MAX_RETRY_DELAY,
        })
    }

    pub async fn execute_with_retry<F, Fut>(&self, mut make_request: F) -> Result<Response>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Response>>,
    {
        let max_retries = 3;
        let mut attempt = 0;

        loop {
            let response = make_request().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            let should_retry = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

            if !should_retry || attempt >= max_retries {
                bail!("HTTP error {}", status);
            }

            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            let delay = Duration::from_secs(retry_after.unwrap_or(1 << attempt))
                .min(self.max_retry_delay);
            log::debug!("retrying in {:?} after HTTP {}", delay, status);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Fetches `url`, refusing bodies larger than the configured limit.
    ///
    /// A declared `Content-Length` over the limit is rejected before the body
    /// is read; otherwise the body is read chunk by chunk and abandoned as soon
    /// as it grows past the limit.
    pub async fn fetch(&self, url: &str) -> Result<RemoteImage> {
        let mut response = self
            .execute_with_retry(|| async { Ok(self.client.get(url).send().await?) })
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if let Some(length) = response.content_length() {
            check_size(length, &self.limits)?;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let filename = filename_from_url(response.url());

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?
        {
            bytes.extend_from_slice(&chunk);
            check_size(bytes.len() as u64, &self.limits)?;
        }

        log::debug!("downloaded {} ({} bytes)", url, bytes.len());

        Ok(RemoteImage {
            filename,
            content_type,
            bytes,
        })
    }
}

/// Last non-empty path segment of the URL, or `download` if there is none.
pub fn filename_from_url(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| "download".to_string())
}

pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
