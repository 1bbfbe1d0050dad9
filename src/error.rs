//! Fatal failures of an install run.
//!
//! Each variant names the stage that failed. None of them is retried: the
//! first error aborts the run and is surfaced to the caller as-is.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    /// No release entry exists for the host's OS/architecture pair.
    #[error("unsupported platform {os}/{arch}: no prebuilt release is published for it")]
    UnsupportedPlatform { os: String, arch: String },

    /// The archive could not be fetched (network failure or non-success status).
    #[error("download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    /// The downloaded archive's SHA-256 does not match the formula.
    #[error("integrity check failed for {url}: expected sha256 {expected}, got {actual}")]
    Integrity {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("extraction of {binary} from {archive:?} failed: {reason}")]
    Extraction {
        archive: PathBuf,
        binary: String,
        reason: String,
    },

    /// The installed binary did not answer `--version` with a zero exit status.
    #[error("smoke test of {path:?} failed: {reason}")]
    SmokeTest { path: PathBuf, reason: String },

    #[error("invalid formula: {0}")]
    Formula(String),

    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

impl InstallError {
    /// Short name of the stage that failed, used in the CLI's error summary.
    pub fn stage(&self) -> &'static str {
        match self {
            InstallError::UnsupportedPlatform { .. } => "resolve",
            InstallError::Download { .. } => "download",
            InstallError::Integrity { .. } => "verify",
            InstallError::Extraction { .. } => "extract",
            InstallError::SmokeTest { .. } => "smoke test",
            InstallError::Formula(_) => "formula",
            InstallError::Io(_) => "install",
        }
    }
}
