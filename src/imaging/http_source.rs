//! Production image loader: HTTP(S) with a local-file fallback.
//!
//! | Input | Handling |
//! |---|---|
//! | `http://…`, `https://…` | blocking `reqwest` GET, explicit timeout, optional [`ImageCache`] |
//! | `file://…` or anything else | read from the local filesystem |
//!
//! Every request has a timeout, so a stalled upstream fails the composition
//! with an [`ImageLoadError`] instead of hanging it.

use super::source::{ImageLoadError, ImageSource, LoadedImage};
use crate::cache::ImageCache;
use crate::config::NetworkConfig;
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Loader backed by a shared blocking HTTP client.
pub struct HttpSource {
    client: Client,
    cache: Option<ImageCache>,
}

impl HttpSource {
    pub fn new(network: &NetworkConfig, cache: Option<ImageCache>) -> Result<Self, ImageLoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(network.timeout_secs))
            .user_agent(network.user_agent.as_str())
            .build()
            .map_err(ImageLoadError::Client)?;
        Ok(Self { client, cache })
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        if let Some(bytes) = self.cache.as_ref().and_then(|c| c.get(url)) {
            debug!(url, "image cache hit");
            return Ok(bytes);
        }

        debug!(url, "fetching image");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| ImageLoadError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|source| ImageLoadError::Http {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        if let Some(cache) = &self.cache {
            // A failed cache write only costs a refetch next time
            if let Err(e) = cache.put(url, &bytes) {
                warn!(url, error = %e, "could not write image cache entry");
            }
        }
        Ok(bytes)
    }
}

fn is_remote(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn read_local(url: &str) -> Result<Vec<u8>, ImageLoadError> {
    let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
    std::fs::read(path).map_err(|source| ImageLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ImageSource for HttpSource {
    fn load(&self, url: &str) -> Result<LoadedImage, ImageLoadError> {
        let bytes = if is_remote(url) {
            self.fetch(url)?
        } else {
            read_local(url)?
        };
        LoadedImage::decode(&bytes).map_err(|source| ImageLoadError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
