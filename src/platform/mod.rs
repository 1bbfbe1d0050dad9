//! Platform detection and normalisation
//!
//! The host is described by a raw [`Platform`] (whatever the target reports
//! or the user overrides) and normalised into a [`PlatformKey`], one of the
//! four OS/architecture pairs that have prebuilt releases.

mod detection;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InstallError;

pub use detection::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    #[serde(alias = "darwin")]
    Macos,
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "arm64", alias = "aarch64")]
    Arm64,
    #[serde(rename = "x86_64", alias = "amd64")]
    X86_64,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Macos => "macos",
            Os::Linux => "linux",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "osx" => Some(Os::Macos),
            "linux" => Some(Os::Linux),
            _ => None,
        }
    }
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X86_64 => "x86_64",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "arm64" | "aarch64" => Some(Arch::Arm64),
            "x86_64" | "amd64" | "x64" => Some(Arch::X86_64),
            _ => None,
        }
    }
}

/// One of the four supported (OS, architecture) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlatformKey {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformKey {
    pub const ALL: [PlatformKey; 4] = [
        PlatformKey::new(Os::Macos, Arch::Arm64),
        PlatformKey::new(Os::Macos, Arch::X86_64),
        PlatformKey::new(Os::Linux, Arch::Arm64),
        PlatformKey::new(Os::Linux, Arch::X86_64),
    ];

    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Parse host identifiers, accepting the common aliases
    /// (`darwin`, `aarch64`, `amd64`).
    pub fn parse(os: &str, arch: &str) -> Result<Self, InstallError> {
        match (Os::parse(os), Arch::parse(arch)) {
            (Some(os), Some(arch)) => Ok(Self { os, arch }),
            _ => Err(InstallError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            }),
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.as_str(), self.arch.as_str())
    }
}
