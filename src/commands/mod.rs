//! Entry points behind the CLI subcommands.

mod config;

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use crate::archive::ArchiveExtractor;
use crate::error::InstallError;
use crate::install::{Installer, resolve_bin_dir};
use crate::platform::{Platform, PlatformKey};
use crate::runtime::Runtime;

pub use config::{Config, FORMULA_ENV};

/// Options shared by `install` and `resolve`.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub platform: Platform,
    pub version: Option<String>,
    pub bin_dir: Option<PathBuf>,
}

/// Wrap a pipeline failure so the top-level message names the stage.
fn stage_failed(err: InstallError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("asciigen failed at the {} stage", stage))
}

fn installer<R: Runtime + 'static>(runtime: R, config: Config) -> Installer<R, ArchiveExtractor> {
    Installer::new(
        runtime,
        config.http_client,
        ArchiveExtractor::new(),
        config.formula,
    )
}

/// Download, verify, install and smoke test the binary.
#[tracing::instrument(skip(runtime, config))]
pub async fn install<R: Runtime + 'static>(
    runtime: R,
    config: Config,
    options: InstallOptions,
) -> Result<()> {
    let bin_dir = resolve_bin_dir(&runtime, options.bin_dir)?;
    let installer = installer(runtime, config);

    let installation = installer
        .install(&options.platform, options.version.as_deref(), &bin_dir)
        .await
        .map_err(stage_failed)?;

    info!(
        "Installed {} {} at {:?}",
        installer.formula.name, installation.release.version, installation.path
    );
    Ok(())
}

/// Print what `install` would fetch and where it would go, without network access.
#[tracing::instrument(skip(runtime, config))]
pub fn resolve<R: Runtime + 'static>(
    runtime: R,
    config: Config,
    options: InstallOptions,
) -> Result<()> {
    let bin_dir = resolve_bin_dir(&runtime, options.bin_dir)?;
    let installer = installer(runtime, config);

    let plan = installer
        .plan(&options.platform, options.version.as_deref(), &bin_dir)
        .map_err(stage_failed)?;

    println!("platform: {}", plan.release.platform);
    println!("version:  {}", plan.release.version);
    println!("url:      {}", plan.release.url);
    println!("sha256:   {}", plan.release.sha256);
    println!("target:   {}", plan.target.display());
    Ok(())
}

/// Run the `--version` smoke test against an installed binary.
#[tracing::instrument(skip(runtime, config))]
pub async fn verify_installed<R: Runtime + 'static>(
    runtime: R,
    config: Config,
    bin_dir: Option<PathBuf>,
) -> Result<()> {
    let bin_dir = resolve_bin_dir(&runtime, bin_dir)?;
    let installer = installer(runtime, config);

    let banner = installer
        .smoke_test(&bin_dir)
        .await
        .map_err(stage_failed)
        .with_context(|| format!("{} in {:?} is not working", installer.formula.binary, bin_dir))?;

    println!("{}", banner);
    Ok(())
}

/// Print the formula metadata and its release table.
pub fn info(config: &Config) {
    let formula = &config.formula;
    println!("{} {}", formula.name, formula.version);
    if !formula.desc.is_empty() {
        println!("{}", formula.desc);
    }
    if !formula.homepage.is_empty() {
        println!("homepage: {}", formula.homepage);
    }
    if !formula.license.is_empty() {
        println!("license:  {}", formula.license);
    }
    println!("releases:");
    for key in PlatformKey::ALL {
        match formula.resolve(key, None) {
            Ok(release) => {
                println!("  {:<13} {}", key.to_string(), release.url);
                println!("  {:<13} sha256 {}", "", release.sha256);
            }
            Err(e) => println!("  {:<13} unavailable: {}", key.to_string(), e),
        }
    }
}
