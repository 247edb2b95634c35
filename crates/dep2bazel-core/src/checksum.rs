//! SHA-256 digests of downloaded archives.
//!
//! The digest covers the raw (still compressed) bytes exactly as served, which
//! is what Bazel's `sha256` attribute verifies.

use sha2::{Digest, Sha256};
use std::io::{self, Read, Seek, SeekFrom};

const BUF_SIZE: usize = 64 * 1024;

/// Digest everything `reader` yields, as lowercase hex.
pub fn sha256_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest an open file from its first byte, leaving the cursor at the start again.
pub fn sha256_file(file: &mut std::fs::File) -> io::Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let digest = sha256_reader(&mut *file)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(digest)
}
