//! File signatures
//!
//! A signature is the lowercase hex SHA-256 digest of a file's content.

use crate::error::{DependencyError, DependencyResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Compute the signature of the file at `path`
pub fn file_signature(path: &Path) -> DependencyResult<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DependencyError::Missing(path.to_path_buf()),
        _ => DependencyError::io(path, e),
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| DependencyError::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
