pub mod check;
pub mod convert;
pub mod init;

use std::path::Path;

use anyhow::{Context, Result};

use crate::api::remote::{is_url, RemoteFetcher, RemoteImage};
use crate::config::Config;

/// A failure whose message has already been printed, e.g. as a `--json` body.
/// `main` exits non-zero without printing it again.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AlreadyReported(pub String);

/// Reads a local path or downloads a URL.
///
/// Local files carry no declared content type; the validator guesses one from
/// the extension instead.
pub async fn load_input(input: &str, config: &Config) -> Result<RemoteImage> {
    if is_url(input) {
        let fetcher = RemoteFetcher::new(config.limits, config.remote.timeout())?;
        return fetcher.fetch(input).await;
    }

    let path = Path::new(input);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(input)
        .to_string();

    Ok(RemoteImage {
        filename,
        content_type: None,
        bytes,
    })
}
