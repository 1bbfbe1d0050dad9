//! SHA-256 digests of downloaded archives.

use sha2::{Digest, Sha256};
use std::io::{self, Write};

use crate::error::InstallError;

/// Whether `s` is a 64-character hex digest (either case).
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compare a computed digest against the expected one.
pub fn verify(url: &str, expected: &str, actual: &str) -> Result<(), InstallError> {
    if expected.eq_ignore_ascii_case(actual) {
        Ok(())
    } else {
        Err(InstallError::Integrity {
            url: url.to_string(),
            expected: expected.to_ascii_lowercase(),
            actual: actual.to_ascii_lowercase(),
        })
    }
}

/// Writer that hashes everything passing through it.
pub struct HashingWriter<W: Write> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Flush the inner writer and return the hex digest of all bytes written.
    pub fn finish(mut self) -> io::Result<String> {
        self.inner.flush()?;
        Ok(hex::encode(self.hasher.finalize()))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("hello world")
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(sha256_hex(b"hello world"), HELLO_SHA256);
    }

    #[test]
    fn test_is_sha256_hex() {
        assert!(is_sha256_hex(HELLO_SHA256));
        assert!(is_sha256_hex(&HELLO_SHA256.to_uppercase()));
        assert!(!is_sha256_hex(&HELLO_SHA256[..63]));
        assert!(!is_sha256_hex(&format!("{}0", HELLO_SHA256)));
        assert!(!is_sha256_hex(&"g".repeat(64)));
    }

    #[test]
    fn test_verify_match_is_case_insensitive() {
        assert!(verify("u", HELLO_SHA256, HELLO_SHA256).is_ok());
        assert!(verify("u", &HELLO_SHA256.to_uppercase(), HELLO_SHA256).is_ok());
    }

    #[test]
    fn test_verify_mismatch() {
        let other = sha256_hex(b"tampered");
        let err = verify("https://example.com/a.tar.gz", HELLO_SHA256, &other).unwrap_err();
        match err {
            InstallError::Integrity {
                url,
                expected,
                actual,
            } => {
                assert_eq!(url, "https://example.com/a.tar.gz");
                assert_eq!(expected, HELLO_SHA256);
                assert_eq!(actual, other);
            }
            other => panic!("Expected Integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_hashing_writer_passes_bytes_through() {
        let mut buffer = Vec::new();
        let mut writer = HashingWriter::new(&mut buffer);
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"world").unwrap();
        let digest = writer.finish().unwrap();

        assert_eq!(digest, HELLO_SHA256);
        assert_eq!(buffer, b"hello world");
    }
}
