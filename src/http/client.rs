//! HTTP client for release downloads.
//!
//! Every request is attempted exactly once; the first failure is returned
//! as [`InstallError::Download`].

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::io::Write;

use super::status::{describe_status, describe_transport_error};
use crate::error::InstallError;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("asciigen-installer/", env!("ASCIIGEN_INSTALLER_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client with the installer's user agent.
    pub fn with_defaults() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Streams the body of a GET request into `writer`, returning the number
    /// of bytes written.
    #[tracing::instrument(skip(self, writer))]
    pub async fn download<W: Write>(&self, url: &str, writer: &mut W) -> Result<u64, InstallError> {
        debug!("GET {}", url);

        let download_error = |reason: String| InstallError::Download {
            url: url.to_string(),
            reason,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(describe_status(status)));
        }

        let mut downloaded_bytes: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| download_error(format!("failed to read response body: {}", e)))?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
