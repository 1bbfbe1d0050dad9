//! Formula: package metadata plus the release descriptor table.
//!
//! The descriptor maps each supported [`PlatformKey`] to a download URL
//! template and the expected SHA-256 of the archive behind it. URL templates
//! carry a `{version}` placeholder that is substituted at resolve time.

mod builtin;

use log::debug;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::checksum::is_sha256_hex;
use crate::error::InstallError;
use crate::platform::{Arch, Os, PlatformKey};
use crate::runtime::Runtime;

/// Placeholder substituted with the requested version in URL templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseEntry {
    pub os: Os,
    pub arch: Arch,
    pub url: String,
    pub sha256: String,
}

impl ReleaseEntry {
    pub fn key(&self) -> PlatformKey {
        PlatformKey::new(self.os, self.arch)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub homepage: String,
    pub version: String,
    #[serde(default)]
    pub license: String,
    /// File name of the executable inside the release archive.
    pub binary: String,
    pub releases: Vec<ReleaseEntry>,
}

/// The single release entry selected for one install run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRelease {
    pub platform: PlatformKey,
    pub version: String,
    pub url: String,
    pub sha256: String,
    /// Last path segment of `url`.
    pub archive_name: String,
}

impl Formula {
    /// Load a formula from a JSON file and validate it.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self, InstallError> {
        let content = runtime.read_to_string(path).map_err(|e| {
            InstallError::Formula(format!("failed to read {}: {:#}", path.display(), e))
        })?;
        let formula: Formula = serde_json::from_str(&content).map_err(|e| {
            InstallError::Formula(format!("failed to parse {}: {}", path.display(), e))
        })?;
        formula.validate()?;
        debug!("Loaded formula {} {} from {:?}", formula.name, formula.version, path);
        Ok(formula)
    }

    /// Check that the descriptor is complete: one entry per supported
    /// platform, each with a well-formed URL and a 64-hex checksum.
    pub fn validate(&self) -> Result<(), InstallError> {
        if self.binary.is_empty() || self.binary.contains(['/', '\\']) {
            return Err(InstallError::Formula(format!(
                "binary name {:?} must be a plain file name",
                self.binary
            )));
        }
        if self.version.trim().is_empty() {
            return Err(InstallError::Formula("version must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for entry in &self.releases {
            let key = entry.key();
            if !seen.insert(key) {
                return Err(InstallError::Formula(format!(
                    "duplicate release entry for {}",
                    key
                )));
            }
            if !is_sha256_hex(&entry.sha256) {
                return Err(InstallError::Formula(format!(
                    "checksum for {} is not a 64-character hex digest",
                    key
                )));
            }
            parse_download_url(&render_url(&entry.url, &self.version))
                .map_err(|reason| InstallError::Formula(format!("url for {}: {}", key, reason)))?;
        }

        if let Some(missing) = PlatformKey::ALL.iter().find(|k| !seen.contains(k)) {
            return Err(InstallError::Formula(format!(
                "missing release entry for {}",
                missing
            )));
        }

        Ok(())
    }

    pub fn entry(&self, key: PlatformKey) -> Option<&ReleaseEntry> {
        self.releases.iter().find(|e| e.key() == key)
    }

    /// Select the release for `key`, substituting `version` (or the
    /// formula's own version) into the URL template.
    pub fn resolve(
        &self,
        key: PlatformKey,
        version: Option<&str>,
    ) -> Result<ResolvedRelease, InstallError> {
        let entry = self
            .entry(key)
            .ok_or_else(|| InstallError::UnsupportedPlatform {
                os: key.os.as_str().to_string(),
                arch: key.arch.as_str().to_string(),
            })?;

        let version = match version {
            Some(v) => normalize_version(v)?,
            None => self.version.clone(),
        };
        let url = render_url(&entry.url, &version);
        let archive_name = parse_download_url(&url)
            .map_err(|reason| InstallError::Formula(format!("url for {}: {}", key, reason)))?
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                InstallError::Formula(format!("url {} does not name an archive file", url))
            })?;

        Ok(ResolvedRelease {
            platform: key,
            version,
            url,
            sha256: entry.sha256.to_ascii_lowercase(),
            archive_name,
        })
    }
}

/// Strip a single leading `v` (`v1.0.0` is the tag of `1.0.0`).
fn normalize_version(requested: &str) -> Result<String, InstallError> {
    let version = requested.strip_prefix('v').unwrap_or(requested);
    if version.is_empty() {
        return Err(InstallError::Formula(format!(
            "version {:?} is empty",
            requested
        )));
    }
    if version.contains(['/', '?', '#']) || version.chars().any(char::is_whitespace) {
        return Err(InstallError::Formula(format!(
            "version {:?} cannot be used in a download URL",
            requested
        )));
    }
    Ok(version.to_string())
}

fn render_url(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

fn parse_download_url(url: &str) -> Result<Url, String> {
    let parsed = Url::parse(url).map_err(|e| format!("{:?} is not a valid URL: {}", url, e))?;
    match parsed.scheme() {
        "https" | "http" => Ok(parsed),
        other => Err(format!("unsupported scheme {:?} in {}", other, url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_has_one_entry_per_platform() {
        let formula = Formula::builtin();
        assert_eq!(formula.releases.len(), 4);

        for key in PlatformKey::ALL {
            let matching: Vec<_> = formula.releases.iter().filter(|e| e.key() == key).collect();
            assert_eq!(matching.len(), 1, "expected exactly one entry for {}", key);

            let entry = matching[0];
            assert_eq!(entry.sha256.len(), 64);
            assert!(entry.sha256.chars().all(|c| c.is_ascii_hexdigit()));

            let resolved = formula.resolve(key, None).unwrap();
            let url = Url::parse(&resolved.url).unwrap();
            assert_eq!(url.scheme(), "https");
            assert!(resolved.archive_name.ends_with(".tar.gz"));
        }
    }

    #[test]
    fn test_builtin_validates() {
        Formula::builtin().validate().unwrap();
    }

    #[test]
    fn test_builtin_metadata() {
        let formula = Formula::builtin();
        assert_eq!(formula.name, "asciigen");
        assert_eq!(formula.binary, "asciigen");
        assert_eq!(formula.version, "1.0.0");
        assert_eq!(formula.license, "MIT");
    }

    #[test]
    fn test_resolve_substitutes_version() {
        let formula = Formula::builtin();
        let key = PlatformKey::new(Os::Linux, Arch::X86_64);

        let resolved = formula.resolve(key, None).unwrap();
        assert_eq!(resolved.version, "1.0.0");
        assert_eq!(
            resolved.url,
            "https://github.com/seatedro/asciigen/releases/download/v1.0.0/asciigen-x86_64-linux.tar.gz"
        );
        assert_eq!(
            resolved.sha256,
            "660a476554c0c670a1559d57a1c71f5d12fb5f8c2d0dcc062e259b7208d9044c"
        );
        assert_eq!(resolved.archive_name, "asciigen-x86_64-linux.tar.gz");

        let resolved = formula.resolve(key, Some("v1.2.0")).unwrap();
        assert_eq!(resolved.version, "1.2.0");
        assert!(resolved.url.contains("/v1.2.0/"));
    }

    #[test]
    fn test_resolve_strips_only_one_leading_v() {
        let formula = Formula::builtin();
        let key = PlatformKey::new(Os::Linux, Arch::X86_64);

        let resolved = formula.resolve(key, Some("1.0.0")).unwrap();
        assert_eq!(resolved.version, "1.0.0");

        let resolved = formula.resolve(key, Some("vv1.0")).unwrap();
        assert_eq!(resolved.version, "v1.0");
        assert!(resolved.url.contains("/download/vv1.0/"));
    }

    #[test]
    fn test_resolve_rejects_empty_version() {
        let formula = Formula::builtin();
        let key = PlatformKey::new(Os::Linux, Arch::X86_64);

        for requested in ["", "v"] {
            let err = formula.resolve(key, Some(requested)).unwrap_err();
            assert!(matches!(err, InstallError::Formula(_)), "{requested:?}");
            assert!(err.to_string().contains("is empty"));
        }
    }

    #[test]
    fn test_resolve_rejects_version_that_breaks_url() {
        let formula = Formula::builtin();
        let key = PlatformKey::new(Os::Linux, Arch::X86_64);

        for requested in ["1.0/../2.0", "1.0 beta", "1.0?x"] {
            let err = formula.resolve(key, Some(requested)).unwrap_err();
            assert!(matches!(err, InstallError::Formula(_)), "{requested:?}");
        }
    }

    #[test]
    fn test_resolve_maps_arm64_to_aarch64_archives() {
        let formula = Formula::builtin();
        let resolved = formula
            .resolve(PlatformKey::new(Os::Macos, Arch::Arm64), None)
            .unwrap();
        assert_eq!(resolved.archive_name, "asciigen-aarch64-macos.tar.gz");
    }

    #[test]
    fn test_resolve_missing_entry_is_unsupported() {
        let mut formula = Formula::builtin();
        formula.releases.retain(|e| e.os != Os::Linux || e.arch != Arch::Arm64);

        let err = formula
            .resolve(PlatformKey::new(Os::Linux, Arch::Arm64), None)
            .unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_validate_rejects_incomplete_table() {
        let mut formula = Formula::builtin();
        formula.releases.pop();

        let err = formula.validate().unwrap_err();
        assert!(err.to_string().contains("missing release entry"));
    }

    #[test]
    fn test_validate_rejects_duplicate_entry() {
        let mut formula = Formula::builtin();
        let dup = formula.releases[0].clone();
        formula.releases.push(dup);

        let err = formula.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate release entry"));
    }

    #[test]
    fn test_validate_rejects_bad_checksum() {
        let mut formula = Formula::builtin();
        formula.releases[1].sha256 = "abc123".into();

        let err = formula.validate().unwrap_err();
        assert!(err.to_string().contains("64-character hex"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut formula = Formula::builtin();
        formula.releases[2].url = "ftp://example.com/asciigen.tar.gz".into();
        assert!(formula.validate().is_err());

        formula.releases[2].url = "not a url".into();
        assert!(formula.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_binary_with_path() {
        let mut formula = Formula::builtin();
        formula.binary = "bin/asciigen".into();
        assert!(formula.validate().is_err());
    }

    #[test]
    fn test_load_from_json() {
        let json = serde_json::to_string(&Formula::builtin()).unwrap();
        let path = PathBuf::from("/etc/asciigen/formula.json");

        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(path.clone()))
            .returning(move |_| Ok(json.clone()));

        let formula = Formula::load(&runtime, &path).unwrap();
        assert_eq!(formula, Formula::builtin());
    }

    #[test]
    fn test_load_accepts_aliases() {
        let json = r#"{
            "name": "asciigen",
            "version": "2.0.0",
            "binary": "asciigen",
            "releases": [
                {"os": "darwin", "arch": "aarch64", "url": "https://example.com/{version}/a.tar.gz", "sha256": "AED7063EF2BBDAA7318B4EE8ECC91BB9641FFC560B8C2D779DA5AC38C81CDD8D"},
                {"os": "macos", "arch": "x86_64", "url": "https://example.com/{version}/b.tar.gz", "sha256": "54e954176e5d1a6c783d570a7b38403aeb19cb148cb128961a6937363f1b2b07"},
                {"os": "linux", "arch": "arm64", "url": "https://example.com/{version}/c.tar.gz", "sha256": "f49031560ba84ae4c09a2006a5081f81b72d34321490d3f002528f7b83c017df"},
                {"os": "linux", "arch": "amd64", "url": "https://example.com/{version}/d.tar.gz", "sha256": "660a476554c0c670a1559d57a1c71f5d12fb5f8c2d0dcc062e259b7208d9044c"}
            ]
        }"#;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(json.to_string()));

        let formula = Formula::load(&runtime, Path::new("formula.json")).unwrap();
        let resolved = formula
            .resolve(PlatformKey::new(Os::Macos, Arch::Arm64), None)
            .unwrap();
        assert_eq!(resolved.url, "https://example.com/2.0.0/a.tar.gz");
        // Checksums are compared in lowercase
        assert_eq!(
            resolved.sha256,
            "aed7063ef2bbdaa7318b4ee8ecc91bb9641ffc560b8c2d779da5ac38c81cdd8d"
        );
    }

    #[test]
    fn test_load_invalid_json() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("{ not json".to_string()));

        let err = Formula::load(&runtime, Path::new("formula.json")).unwrap_err();
        assert!(matches!(err, InstallError::Formula(_)));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_load_missing_file() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Err(anyhow::anyhow!("Failed to read file to string")));

        let err = Formula::load(&runtime, Path::new("missing.json")).unwrap_err();
        assert!(matches!(err, InstallError::Formula(_)));
        assert!(err.to_string().contains("failed to read"));
    }
}
