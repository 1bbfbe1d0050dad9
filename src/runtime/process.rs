//! Running installed binaries.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use tokio::process::Command;

use super::RealRuntime;

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) async fn run_impl(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        // Awaited, so the Ctrl-C task keeps running alongside the child
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to execute {:?}", program))?;

        debug!("{:?} exited with {}", program, output.status);

        Ok(CommandOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
