use anyhow::{Context, Result, bail};
use log::info;
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Environment variable overriding the target executable directory.
pub const BIN_DIR_ENV: &str = "ASCIIGEN_BIN_DIR";

/// The directory the binary is installed into: the explicit choice if
/// given, otherwise the default for the current user.
#[tracing::instrument(skip(runtime))]
pub fn resolve_bin_dir<R: Runtime>(runtime: &R, explicit: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match explicit {
        // An empty directory would leave a bare `asciigen` that resolves through PATH
        Some(path) if path.as_os_str().is_empty() => {
            bail!("The bin directory must not be empty")
        }
        Some(path) => path,
        None => default_bin_dir(runtime)?,
    };
    info!("Using bin directory: {}", dir.display());
    Ok(dir)
}

/// `~/.local/bin` for regular users, a system-wide directory when privileged.
#[tracing::instrument(skip(runtime))]
pub fn default_bin_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if runtime.is_privileged() {
        Ok(system_bin_dir())
    } else {
        let home_dir = runtime
            .home_dir()
            .context("Could not find home directory")?;
        Ok(home_dir.join(".local").join("bin"))
    }
}

#[cfg(target_os = "windows")]
fn system_bin_dir() -> PathBuf {
    PathBuf::from(r"C:\ProgramData\asciigen\bin")
}

#[cfg(not(target_os = "windows"))]
fn system_bin_dir() -> PathBuf {
    PathBuf::from("/usr/local/bin")
}
