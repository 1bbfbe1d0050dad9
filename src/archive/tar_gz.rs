use crate::error::InstallError;
use crate::runtime::Runtime;
use flate2::read::GzDecoder;
use log::debug;
use std::io::Read;
use std::path::Path;
use tar::{Archive, EntryType};

use super::{ExtractedBinary, Extractor};

/// Extractor for .tar.gz / .tgz archives
#[derive(Default)]
pub struct TarGzExtractor;

impl Extractor for TarGzExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".tar.gz") || name.ends_with(".tgz")
    }

    fn extract_binary<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        binary: &str,
    ) -> Result<ExtractedBinary, InstallError> {
        debug!("Scanning {:?} for {}...", archive_path, binary);

        let extraction_error = |reason: String| InstallError::Extraction {
            archive: archive_path.to_path_buf(),
            binary: binary.to_string(),
            reason,
        };

        let file = runtime
            .open(archive_path)
            .map_err(|e| extraction_error(format!("{:#}", e)))?;
        let mut archive = Archive::new(GzDecoder::new(file));

        let mut found: Option<ExtractedBinary> = None;
        let entries = archive
            .entries()
            .map_err(|e| extraction_error(format!("not a valid tar.gz archive: {}", e)))?;

        for entry in entries {
            let mut entry =
                entry.map_err(|e| extraction_error(format!("corrupt archive entry: {}", e)))?;

            let entry_type = entry.header().entry_type();
            if !matches!(entry_type, EntryType::Regular | EntryType::Continuous) {
                continue;
            }

            let path = entry
                .path()
                .map_err(|e| extraction_error(format!("invalid entry path: {}", e)))?
                .into_owned();
            if path.file_name().and_then(|n| n.to_str()) != Some(binary) {
                continue;
            }

            if found.is_some() {
                return Err(extraction_error(format!(
                    "archive contains more than one entry named {}",
                    binary
                )));
            }

            debug!("Found {} at {:?}", binary, path);
            let mode = entry.header().mode().unwrap_or(0o755);
            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut contents)
                .map_err(|e| extraction_error(format!("failed to read {:?}: {}", path, e)))?;

            found = Some(ExtractedBinary {
                entry_path: path,
                contents,
                mode,
            });
        }

        found.ok_or_else(|| extraction_error(format!("archive has no entry named {}", binary)))
    }
}
