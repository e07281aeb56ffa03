use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

use crate::stats::StatsError;

/// Where a read-only resource (snapshot, avatar manifest) is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocation {
    File(PathBuf),
    Http(String),
}

impl ResourceLocation {
    /// `http://` and `https://` values are URLs, anything else is a file path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ResourceLocation::Http(trimmed.to_string())
        } else {
            ResourceLocation::File(PathBuf::from(trimmed))
        }
    }

    /// Reads the whole resource. Missing files, network errors and non-success
    /// responses are all reported as [`StatsError::ResourceUnavailable`].
    #[instrument]
    pub async fn fetch(&self) -> Result<Vec<u8>, StatsError> {
        let bytes = match self {
            ResourceLocation::File(path) => tokio::fs::read(path).await.map_err(|e| {
                warn!(error = %e, path = %path.display(), "Failed to read resource file");
                match e.kind() {
                    ErrorKind::NotFound => {
                        StatsError::ResourceUnavailable(format!("{} not found", path.display()))
                    }
                    _ => StatsError::ResourceUnavailable(format!("{}: {}", path.display(), e)),
                }
            })?,
            ResourceLocation::Http(url) => fetch_http(url).await?,
        };

        debug!(location = %self, bytes = bytes.len(), "Resource fetched");
        Ok(bytes)
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLocation::File(path) => write!(f, "{}", path.display()),
            ResourceLocation::Http(url) => f.write_str(url),
        }
    }
}

async fn fetch_http(url: &str) -> Result<Vec<u8>, StatsError> {
    let unavailable = |e: reqwest::Error| {
        warn!(error = %e, url = %url, "Failed to fetch resource");
        StatsError::ResourceUnavailable(format!("{}: {}", url, e))
    };

    let response = reqwest::get(url)
        .await
        .map_err(unavailable)?
        .error_for_status()
        .map_err(unavailable)?;

    let body = response.bytes().await.map_err(unavailable)?;
    Ok(body.to_vec())
}
