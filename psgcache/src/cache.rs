//! Filename-keyed on-disk asset cache

use crate::download::fetch_to_file;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for asset downloads (30 seconds)
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Suffix of in-flight download files under the cache root
const PARTIAL_SUFFIX: &str = ".part";

/// On-disk cache of display assets, keyed by filename.
///
/// Semantics are download-or-reuse: a file that exists under the cache
/// root is authoritative and is never re-fetched, re-validated or
/// evicted. Cache invalidation happens upstream through filename
/// changes, and two assets sharing a filename collide on the same entry.
///
/// Downloads are written to a `.part` sibling and renamed into place on
/// success, so readers (the HTTP surface serving the cache root) only
/// ever observe complete files.
///
/// The type is cheap to clone and safe to share across tasks: it holds
/// only the root path and a pooled HTTP client.
#[derive(Debug, Clone)]
pub struct AssetCache {
    dir: PathBuf,
    client: reqwest::Client,
}

impl AssetCache {
    /// Open the cache at `dir`, creating the directory if needed.
    ///
    /// An uncreatable cache root is a startup-fatal condition for the
    /// agent; the error carries the underlying IO diagnostic.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            dir: dir.to_path_buf(),
            client,
        })
    }

    /// Open the cache with a caller-provided HTTP client.
    pub fn with_client(dir: &Path, client: reqwest::Client) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            client,
        })
    }

    /// Root directory of the cache.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an entry with this filename lives at (whether or not it exists).
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Path of the entry if it is fully materialized on disk.
    pub fn lookup(&self, filename: &str) -> Option<PathBuf> {
        let path = self.file_path(filename);
        path.is_file().then_some(path)
    }

    /// Make sure the asset is present locally, downloading it if needed.
    ///
    /// If a file named `filename` already exists under the cache root it
    /// is returned immediately, without any network traffic. Otherwise
    /// `url` is streamed to a temporary file and atomically installed
    /// under `filename`; on failure the temporary file is removed, so no
    /// truncated entry ever becomes visible.
    pub async fn ensure(&self, asset_id: &str, url: &str, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;

        let path = self.file_path(filename);
        if path.is_file() {
            debug!(asset = %asset_id, file = %filename, "Asset already cached");
            return Ok(path);
        }

        info!(asset = %asset_id, %url, file = %filename, "Downloading asset");
        let partial = self.dir.join(format!("{filename}{PARTIAL_SUFFIX}"));

        if let Err(e) = fetch_to_file(&self.client, url, &partial).await {
            // Complete file or no file: never leave a truncated entry.
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        tokio::fs::rename(&partial, &path).await?;
        info!(asset = %asset_id, file = %filename, "Asset cached");
        Ok(path)
    }
}

/// Reject filenames that would resolve outside the cache root.
fn validate_filename(filename: &str) -> Result<()> {
    let valid = !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && filename != "."
        && filename != "..";
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidFilename(filename.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("welcome.jpg").is_ok());
        assert!(validate_filename("promo-video.mp4").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("../escape.jpg").is_err());
        assert!(validate_filename("nested/escape.jpg").is_err());
    }

    #[test]
    fn test_lookup_misses_on_absent_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path()).unwrap();
        assert!(cache.lookup("missing.png").is_none());
    }
}
