use super::{Formula, ReleaseEntry};
use crate::platform::{Arch, Os};

const RELEASE_BASE: &str = "https://github.com/seatedro/asciigen/releases/download/v{version}";

/// (os, arch, archive name, sha256) for the published 1.0.0 archives.
const RELEASES: [(Os, Arch, &str, &str); 4] = [
    (
        Os::Macos,
        Arch::Arm64,
        "asciigen-aarch64-macos.tar.gz",
        "aed7063ef2bbdaa7318b4ee8ecc91bb9641ffc560b8c2d779da5ac38c81cdd8d",
    ),
    (
        Os::Macos,
        Arch::X86_64,
        "asciigen-x86_64-macos.tar.gz",
        "54e954176e5d1a6c783d570a7b38403aeb19cb148cb128961a6937363f1b2b07",
    ),
    (
        Os::Linux,
        Arch::Arm64,
        "asciigen-aarch64-linux.tar.gz",
        "f49031560ba84ae4c09a2006a5081f81b72d34321490d3f002528f7b83c017df",
    ),
    (
        Os::Linux,
        Arch::X86_64,
        "asciigen-x86_64-linux.tar.gz",
        "660a476554c0c670a1559d57a1c71f5d12fb5f8c2d0dcc062e259b7208d9044c",
    ),
];

impl Formula {
    /// The asciigen formula compiled into the installer.
    pub fn builtin() -> Self {
        Self {
            name: "asciigen".into(),
            desc: "Converts images to ascii art".into(),
            homepage: "https://github.com/seatedro/asciigen".into(),
            version: "1.0.0".into(),
            license: "MIT".into(),
            binary: "asciigen".into(),
            releases: RELEASES
                .iter()
                .map(|(os, arch, archive, sha256)| ReleaseEntry {
                    os: *os,
                    arch: *arch,
                    url: format!("{}/{}", RELEASE_BASE, archive),
                    sha256: (*sha256).to_string(),
                })
                .collect(),
        }
    }
}
