//! # psgcache - On-disk asset cache for PMOSignage
//!
//! Maps asset filenames to locally stored files with idempotent
//! download-or-reuse semantics:
//!
//! - an existing file is returned without a network call
//! - a missing file is streamed to a `.part` temporary and renamed into
//!   place, so readers only ever see complete files
//! - nothing is ever evicted or re-validated; invalidation is keyed by
//!   filename changes upstream
//!
//! # Example
//!
//! ```no_run
//! use psgcache::AssetCache;
//! use std::path::Path;
//!
//! # async fn example() -> psgcache::Result<()> {
//! let cache = AssetCache::new(Path::new("/var/cache/signage"))?;
//!
//! let path = cache
//!     .ensure("welcome-img", "https://blob.example.com/welcome.jpg", "welcome.jpg")
//!     .await?;
//! println!("serving {}", path.display());
//!
//! // Second call with the same filename: no download.
//! cache
//!     .ensure("welcome-img", "https://blob.example.com/welcome.jpg", "welcome.jpg")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod download;

mod cache;
mod error;

pub use cache::{AssetCache, DOWNLOAD_TIMEOUT_SECS};
pub use error::{Error, Result};
