//! Streaming download of a URL into a local file

use crate::error::{Error, Result};
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Download `url` into `dest`, streaming chunk by chunk.
///
/// The destination is created (truncated if present) and fully written
/// before this returns `Ok`. On any failure the partially written file
/// is left behind at `dest`; callers that need all-or-nothing semantics
/// point `dest` at a temporary path and rename after success, which is
/// exactly what [`AssetCache::ensure`](crate::AssetCache::ensure) does.
pub async fn fetch_to_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status,
        });
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(())
}
