//! HTTP downloads.
//!
//! Bodies are streamed to disk chunk by chunk (the SDK archive is large) and
//! always land in a temporary file first. Callers move the temporary file into
//! place only once the download has completed, so an interrupted download is
//! never mistaken for a provisioned dependency.

use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::types::ProvisionError;

/// Build the client used for every download in a provisioning pass.
pub fn http_client(user_agent: &str) -> Result<reqwest::Client, ProvisionError> {
  reqwest::Client::builder()
    .user_agent(user_agent)
    .build()
    .map_err(ProvisionError::Client)
}

/// Download `url` into `dest`, creating or truncating it.
///
/// Returns the number of bytes written. Non-success statuses are errors; there
/// is no retry.
pub async fn download_to(client: &reqwest::Client, url: &str, dest: &Path) -> Result<u64, ProvisionError> {
  info!(url = %url, "fetching URL");

  let fetch_err = |message: String| ProvisionError::Fetch {
    url: url.to_string(),
    message,
  };

  let mut response = client.get(url).send().await.map_err(|e| fetch_err(e.to_string()))?;

  if !response.status().is_success() {
    return Err(fetch_err(format!("HTTP {}", response.status())));
  }

  let mut file = fs::File::create(dest).await.map_err(ProvisionError::io(dest))?;
  let mut written: u64 = 0;

  while let Some(chunk) = response.chunk().await.map_err(|e| fetch_err(e.to_string()))? {
    file.write_all(&chunk).await.map_err(ProvisionError::io(dest))?;
    written += chunk.len() as u64;
  }

  file.flush().await.map_err(ProvisionError::io(dest))?;

  debug!(path = ?dest, size = written, "download complete");
  Ok(written)
}

/// Convert a URL to a safe filename.
///
/// Takes the last path component and sanitizes it. The extension decides how an
/// archive is unpacked, so it must survive. Falls back to `download` when the
/// URL has no usable final component.
pub fn url_to_filename(url: &str) -> String {
  let path = url.split(['?', '#']).next().unwrap_or(url);

  if let Some(filename) = path.rsplit('/').next() {
    // Sanitize: only allow alphanumeric, dash, underscore, dot
    let sanitized: String = filename
      .chars()
      .map(|c| {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
          c
        } else {
          '_'
        }
      })
      .collect();

    if !sanitized.is_empty() && sanitized != "." && sanitized != ".." {
      return sanitized;
    }
  }

  "download".to_string()
}
