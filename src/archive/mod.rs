mod tar_gz;

use crate::error::InstallError;
use crate::runtime::Runtime;
use std::path::{Path, PathBuf};

pub use tar_gz::TarGzExtractor;

/// The single executable pulled out of a release archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBinary {
    /// Path of the entry inside the archive.
    pub entry_path: PathBuf,
    pub contents: Vec<u8>,
    /// Mode bits recorded in the archive header.
    pub mode: u32,
}

/// Trait for format-specific archive extractors
pub trait Extractor: Send + Sync {
    /// Check if this extractor can handle the given archive format
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Find the one regular-file entry whose file name is `binary` and read
    /// it into memory. Fails if there is no such entry or more than one.
    fn extract_binary<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        binary: &str,
    ) -> Result<ExtractedBinary, InstallError>;
}

/// Dispatcher that selects the appropriate extractor based on archive format.
#[derive(Default)]
pub struct ArchiveExtractor {
    tar_gz: TarGzExtractor,
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Extractor for ArchiveExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        self.tar_gz.can_handle(archive_path)
    }

    #[tracing::instrument(skip(self, runtime))]
    fn extract_binary<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        binary: &str,
    ) -> Result<ExtractedBinary, InstallError> {
        if self.tar_gz.can_handle(archive_path) {
            return self.tar_gz.extract_binary(runtime, archive_path, binary);
        }
        Err(InstallError::Extraction {
            archive: archive_path.to_path_buf(),
            binary: binary.to_string(),
            reason: "unsupported archive format".to_string(),
        })
    }
}
