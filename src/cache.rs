//! Download cache for source images.
//!
//! Cover art and scannable codes never change for a given URL, so repeated
//! compositions of the same item (different resolutions, say) can skip the
//! network entirely.
//!
//! # Design
//!
//! The cache is **content-addressed by URL**: each entry is a file named by
//! the SHA-256 of the URL it was fetched from, holding the raw response bytes.
//! Storing the encoded bytes (not decoded pixels) keeps entries small and
//! means a corrupt entry fails decoding exactly like a bad download would.
//!
//! ```text
//! <state_dir>/cache/
//! ├── 3f1c…e2a9      # cover JPEG
//! └── 9b07…41d3      # code PNG
//! ```
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `compose`, or set `network.cache = false`. Local file
//! paths are never cached.

use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};

/// Directory name of the cache within the state directory.
pub const CACHE_DIRNAME: &str = "cache";

/// On-disk cache of downloaded bytes, keyed by URL.
#[derive(Debug, Clone)]
pub struct ImageCache {
    dir: PathBuf,
}

impl ImageCache {
    /// Cache rooted at `<state_dir>/cache`. The directory is created lazily.
    pub fn in_state_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(CACHE_DIRNAME))
    }

    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached bytes for `url`, if present and readable.
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        std::fs::read(self.entry_path(url)).ok()
    }

    /// Store the bytes fetched from `url`.
    ///
    /// Writes to a temp file first so a crash never leaves a truncated entry
    /// under the final name.
    pub fn put(&self, url: &str, bytes: &[u8]) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(url);
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)
    }

    /// Remove every cached entry. Returns the number of files deleted.
    pub fn clear(&self) -> io::Result<usize> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };
        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(url_key(url))
    }
}

/// Hex SHA-256 of a URL.
pub fn url_key(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn url_key_is_stable_hex() {
        let key = url_key("https://i.example/cover.jpg");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, url_key("https://i.example/cover.jpg"));
        assert_ne!(key, url_key("https://i.example/other.jpg"));
    }

    #[test]
    fn miss_then_hit() {
        let tmp = TempDir::new().unwrap();
        let cache = ImageCache::in_state_dir(tmp.path());
        assert_eq!(cache.get("https://i.example/a.png"), None);

        cache.put("https://i.example/a.png", b"bytes").unwrap();
        assert_eq!(cache.get("https://i.example/a.png").as_deref(), Some(&b"bytes"[..]));
        assert_eq!(cache.get("https://i.example/b.png"), None);
    }

    #[test]
    fn put_overwrites() {
        let tmp = TempDir::new().unwrap();
        let cache = ImageCache::new(tmp.path().join("c"));
        cache.put("u", b"one").unwrap();
        cache.put("u", b"two").unwrap();
        assert_eq!(cache.get("u").as_deref(), Some(&b"two"[..]));
    }

    #[test]
    fn clear_removes_entries() {
        let tmp = TempDir::new().unwrap();
        let cache = ImageCache::in_state_dir(tmp.path());
        assert_eq!(cache.clear().unwrap(), 0);
        cache.put("a", b"1").unwrap();
        cache.put("b", b"2").unwrap();
        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.get("a"), None);
    }
}
