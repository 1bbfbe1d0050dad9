//! Post-install smoke test: the binary must run and answer `--version`.

use log::{debug, info};
use std::path::Path;

use crate::error::InstallError;
use crate::runtime::Runtime;

pub const VERSION_FLAG: &str = "--version";

/// Run `binary --version` and require a zero exit status.
/// Returns the trimmed version banner printed by the binary.
#[tracing::instrument(skip(runtime))]
pub async fn run_smoke_test<R: Runtime>(runtime: &R, binary: &Path) -> Result<String, InstallError> {
    let smoke_error = |reason: String| InstallError::SmokeTest {
        path: binary.to_path_buf(),
        reason,
    };

    if !runtime.exists(binary) {
        return Err(smoke_error("binary is not installed".to_string()));
    }

    let output = runtime
        .run(binary, &[VERSION_FLAG.to_string()])
        .await
        .map_err(|e| smoke_error(format!("could not be executed: {:#}", e)))?;

    if !output.success {
        let status = match output.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by a signal".to_string(),
        };
        let stderr = output.stderr.trim();
        let reason = if stderr.is_empty() {
            format!("{} {}", VERSION_FLAG, status)
        } else {
            format!("{} {}: {}", VERSION_FLAG, status, stderr)
        };
        return Err(smoke_error(reason));
    }

    let banner = output.stdout.trim().to_string();
    debug!("{:?} {} -> {:?}", binary, VERSION_FLAG, banner);
    info!("Smoke test passed for {:?}", binary);
    Ok(banner)
}
