use crate::platform::Os;

/// Object format of an extracted executable, as far as goblin can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    Elf,
    MachO,
    Pe,
    Script,
    Unknown,
}

impl BinaryFormat {
    pub fn detect(bytes: &[u8]) -> Self {
        match goblin::Object::parse(bytes) {
            Ok(goblin::Object::Elf(_)) => BinaryFormat::Elf,
            Ok(goblin::Object::Mach(_)) => BinaryFormat::MachO,
            Ok(goblin::Object::PE(_)) => BinaryFormat::Pe,
            _ if bytes.starts_with(b"#!") => BinaryFormat::Script,
            _ => BinaryFormat::Unknown,
        }
    }

    /// Whether this format runs natively on `os`.
    pub fn is_native_for(&self, os: Os) -> bool {
        matches!(
            (*self, os),
            (BinaryFormat::Elf, Os::Linux) | (BinaryFormat::MachO, Os::Macos)
        )
    }
}
