//! Card image downloads.
//!
//! One fetch per reconciled record, stored under the deterministic
//! filename `<out_dir>/<id>_<name>.jpg`. Non-2xx responses are skipped
//! rather than treated as errors: upstream image hosting is patchy for
//! old sets and a missing scan should not abort a download run.

use anyhow::{anyhow, Context, Result};
use grimoire_cards::CardRecord;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "grimoire/0.3 (+https://github.com/grimoire-tools/grimoire)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Target path for one card's image: `<out_dir>/<id>_<name>.jpg`.
///
/// This naming is a contract with downstream consumers of the image
/// directory; keep it stable. The name goes in verbatim, which assumes
/// card names contain no path separators — true of the upstream data.
pub fn card_image_path(out_dir: &Path, card: &CardRecord) -> PathBuf {
    out_dir.join(format!("{}_{}.jpg", card.id, card.name))
}

/// Outcome of one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx response; bytes written to the target path.
    Stored,
    /// Non-2xx response; nothing written.
    Skipped(u16),
}

pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("grimoire")),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;

        Ok(Self { client })
    }

    /// Fetch `image_url` and store it at `dest`.
    ///
    /// Transport-level failures (bad URL, connect/read errors, IO) are
    /// real errors; an HTTP error status is a skip.
    pub fn fetch(&self, image_url: &str, dest: &Path) -> Result<FetchOutcome> {
        let url = Url::parse(image_url).with_context(|| format!("invalid image url: {image_url}"))?;

        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("failed to fetch {image_url}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Ok(FetchOutcome::Skipped(status.as_u16()));
        }

        let bytes = resp
            .bytes()
            .with_context(|| format!("failed to read image body for {image_url}"))?;
        fs::write(dest, &bytes)
            .with_context(|| format!("failed to write image to {}", dest.display()))?;

        Ok(FetchOutcome::Stored)
    }
}
