use crate::checksum::HashingWriter;
use crate::error::InstallError;
use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::Context;
use log::{debug, info};
use std::path::Path;

/// An archive fetched to local disk, with the digest of its bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedArchive {
    pub sha256: String,
    pub size: u64,
}

/// Downloads `url` to `dest`, hashing the bytes as they are written.
/// A partially written file is removed on failure.
#[tracing::instrument(skip(runtime, dest, http_client))]
pub async fn download_archive<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<DownloadedArchive, InstallError> {
    info!("Downloading {}...", url);

    let result = fetch(runtime, url, dest, http_client).await;
    if result.is_err() && runtime.exists(dest) {
        debug!("Removing partial download {:?}", dest);
        let _ = runtime.remove_file(dest);
    }
    let (sha256, size) = result?;

    info!("Download complete ({} bytes, sha256 {}).", size, sha256);
    Ok(DownloadedArchive {
        sha256,
        size,
    })
}

async fn fetch<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<(String, u64), InstallError> {
    let file = runtime
        .create_file(dest)
        .with_context(|| format!("Failed to create temporary file at {:?}", dest))?;
    let mut writer = HashingWriter::new(file);
    let size = http_client.download(url, &mut writer).await?;
    let sha256 = writer
        .finish()
        .with_context(|| format!("Failed to flush {:?}", dest))?;
    Ok((sha256, size))
}
