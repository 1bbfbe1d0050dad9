//! The install pipeline: resolve, download, verify, extract, place, smoke test.
//!
//! Every stage either succeeds or aborts the run with an [`InstallError`].
//! The target binary is only written after the archive digest matched, and
//! it is written to a staging file first and renamed into place.

mod inspect;
mod paths;

use anyhow::Context;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::archive::Extractor;
use crate::checksum;
use crate::cleanup::{self, SharedCleanupContext, TempFileGuard};
use crate::download::download_archive;
use crate::error::InstallError;
use crate::formula::{Formula, ResolvedRelease};
use crate::http::HttpClient;
use crate::platform::Platform;
use crate::runtime::Runtime;
use crate::smoke::run_smoke_test;

pub use inspect::BinaryFormat;
pub use paths::{BIN_DIR_ENV, default_bin_dir, resolve_bin_dir};

/// Mode of the installed executable.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Everything decided before any network access.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallPlan {
    pub release: ResolvedRelease,
    /// Final path of the installed binary.
    pub target: PathBuf,
}

/// Outcome of a successful install run.
#[derive(Debug, Clone, PartialEq)]
pub struct Installation {
    pub path: PathBuf,
    pub release: ResolvedRelease,
    pub archive_sha256: String,
    /// What the binary printed for `--version`.
    pub version_banner: String,
}

pub struct Installer<R: Runtime, E: Extractor> {
    pub runtime: R,
    pub http_client: HttpClient,
    pub extractor: E,
    pub formula: Formula,
}

impl<R: Runtime + 'static, E: Extractor> Installer<R, E> {
    pub fn new(runtime: R, http_client: HttpClient, extractor: E, formula: Formula) -> Self {
        Self {
            runtime,
            http_client,
            extractor,
            formula,
        }
    }

    /// Select the release entry for `platform` and the target path.
    /// Performs no network or filesystem access.
    #[tracing::instrument(skip(self))]
    pub fn plan(
        &self,
        platform: &Platform,
        version: Option<&str>,
        bin_dir: &Path,
    ) -> Result<InstallPlan, InstallError> {
        if bin_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("The bin directory must not be empty").into());
        }
        let key = platform.key()?;
        let release = self.formula.resolve(key, version)?;
        debug!("Resolved {} to {}", key, release.url);

        Ok(InstallPlan {
            release,
            target: bin_dir.join(&self.formula.binary),
        })
    }

    /// Run the whole pipeline for the host `platform`.
    #[tracing::instrument(skip(self))]
    pub async fn install(
        &self,
        platform: &Platform,
        version: Option<&str>,
        bin_dir: &Path,
    ) -> Result<Installation, InstallError> {
        let plan = self.plan(platform, version, bin_dir)?;

        let cleanup_ctx = cleanup::new_shared();
        let cleanup_ctx_clone = Arc::clone(&cleanup_ctx);

        let ctrl_c_handler = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupted, cleaning up...");
                cleanup::cleanup_shared(&cleanup_ctx_clone);
                std::process::exit(130); // Standard exit code for Ctrl-C
            }
        });

        let result = self.install_with_cleanup(&plan, Arc::clone(&cleanup_ctx)).await;

        ctrl_c_handler.abort();
        result
    }

    /// Steps 3 to 6 of the pipeline for an already resolved plan.
    #[tracing::instrument(skip(self, cleanup_ctx))]
    pub async fn install_with_cleanup(
        &self,
        plan: &InstallPlan,
        cleanup_ctx: SharedCleanupContext,
    ) -> Result<Installation, InstallError> {
        let release = &plan.release;
        let name = &self.formula.name;

        if !self.extractor.can_handle(Path::new(&release.archive_name)) {
            return Err(InstallError::Extraction {
                archive: PathBuf::from(&release.archive_name),
                binary: self.formula.binary.clone(),
                reason: "unsupported archive format".to_string(),
            });
        }

        println!(
            " downloading {} {} ({})",
            name, release.version, release.platform
        );
        let archive_path = self
            .runtime
            .temp_dir()
            .join(format!("v{}-{}", release.version, release.archive_name));
        let archive_guard = TempFileGuard::new(Arc::clone(&cleanup_ctx), archive_path);

        let archive = download_archive(
            &self.runtime,
            &release.url,
            archive_guard.path(),
            &self.http_client,
        )
        .await?;

        checksum::verify(&release.url, &release.sha256, &archive.sha256)?;
        println!(
            "   verified sha256 {} ({} bytes)",
            archive.sha256, archive.size
        );

        let binary = self.extractor.extract_binary(
            &self.runtime,
            archive_guard.path(),
            &self.formula.binary,
        )?;
        drop(archive_guard);
        debug!(
            "Extracted {:?} (archive mode {:o}, {} bytes) from {}",
            binary.entry_path,
            binary.mode,
            binary.contents.len(),
            release.archive_name
        );

        let format = BinaryFormat::detect(&binary.contents);
        if !format.is_native_for(release.platform.os) {
            warn!(
                "{} from {} is not a native {} executable ({:?})",
                self.formula.binary,
                release.archive_name,
                release.platform.os.as_str(),
                format
            );
        }

        println!("  installing {} {} -> {}", name, release.version, plan.target.display());
        self.place_binary(&plan.target, &binary.contents, cleanup_ctx)?;

        let version_banner = run_smoke_test(&self.runtime, &plan.target).await?;
        println!("   installed {} ({})", plan.target.display(), version_banner);

        Ok(Installation {
            path: plan.target.clone(),
            release: release.clone(),
            archive_sha256: archive.sha256,
            version_banner,
        })
    }

    /// Smoke test an already installed binary in `bin_dir`.
    #[tracing::instrument(skip(self))]
    pub async fn smoke_test(&self, bin_dir: &Path) -> Result<String, InstallError> {
        run_smoke_test(&self.runtime, &bin_dir.join(&self.formula.binary)).await
    }

    /// Write `contents` to a staging file next to `target`, make it
    /// executable and rename it over `target`.
    fn place_binary(
        &self,
        target: &Path,
        contents: &[u8],
        cleanup_ctx: SharedCleanupContext,
    ) -> Result<(), InstallError> {
        let bin_dir = target
            .parent()
            .with_context(|| format!("{:?} has no parent directory", target))?;
        self.runtime
            .create_dir_all(bin_dir)
            .with_context(|| format!("Failed to create bin directory {:?}", bin_dir))?;

        let staging = bin_dir.join(format!(".{}.partial", self.formula.binary));
        let staging_guard = TempFileGuard::new(cleanup_ctx, staging.clone());

        self.runtime
            .write(&staging, contents)
            .with_context(|| format!("Failed to write {:?}", staging))?;
        self.runtime
            .set_permissions(&staging, EXECUTABLE_MODE)
            .with_context(|| format!("Failed to make {:?} executable", staging))?;
        self.runtime
            .rename(&staging, target)
            .with_context(|| format!("Failed to move {:?} to {:?}", staging, target))?;
        staging_guard.disarm();

        info!("Installed {} bytes to {:?}", contents.len(), target);
        Ok(())
    }
}
