use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Temporary files of the current install run, removed on failure or Ctrl-C.
#[derive(Default)]
pub struct CleanupContext {
    paths: Vec<PathBuf>,
}

impl CleanupContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: PathBuf) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Stop tracking a path (it was consumed or renamed into place).
    pub fn remove(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete every tracked file that still exists.
    pub fn cleanup(&mut self) {
        for path in self.paths.drain(..) {
            if path.is_file() {
                debug!("Cleaning up: {:?}", path);
                let _ = std::fs::remove_file(&path);
            }
        }
    }
}

pub type SharedCleanupContext = Arc<Mutex<CleanupContext>>;

pub fn new_shared() -> SharedCleanupContext {
    Arc::new(Mutex::new(CleanupContext::new()))
}

fn lock(ctx: &SharedCleanupContext) -> MutexGuard<'_, CleanupContext> {
    ctx.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Remove everything tracked by a shared context (interrupt path).
pub fn cleanup_shared(ctx: &SharedCleanupContext) {
    lock(ctx).cleanup();
}

/// Tracks one temporary file for the duration of a pipeline stage.
///
/// Dropping the guard deletes the file; [`TempFileGuard::disarm`] keeps it
/// (after it has been renamed into place, for instance).
pub struct TempFileGuard {
    ctx: SharedCleanupContext,
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    pub fn new(ctx: SharedCleanupContext, path: PathBuf) -> Self {
        lock(&ctx).add(path.clone());
        Self {
            ctx,
            path,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        lock(&self.ctx).remove(&self.path);
        if self.armed && self.path.is_file() {
            debug!("Removing temporary file {:?}", self.path);
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
