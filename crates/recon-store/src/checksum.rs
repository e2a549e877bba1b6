//! `<file>.sha256` sidecars.

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::Path;

use recon_core::validate::{sha256_hex, sidecar_path};

use crate::atomic::atomic_write;
use crate::errors::{io_error, Result};

/// Hash `path` and write `<hex>  <file name>` next to it; returns the hash
pub fn write_checksum(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| io_error("write_checksum", path, e))?;
    let digest = sha256_hex(&bytes);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    atomic_write(&sidecar_path(path), format!("{}  {}\n", digest, name).as_bytes())?;
    Ok(digest)
}

/// Stored hash for `path`, if it has a sidecar
pub fn read_checksum(path: &Path) -> Result<Option<String>> {
    let sidecar = sidecar_path(path);
    match fs::read_to_string(&sidecar) {
        Ok(text) => Ok(text.split_whitespace().next().map(str::to_string)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error("read_checksum", &sidecar, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a1.diff-doc");
        fs::write(&path, "asset_id: a1\n").unwrap();

        assert_eq!(read_checksum(&path).unwrap(), None);
        let digest = write_checksum(&path).unwrap();
        assert_eq!(read_checksum(&path).unwrap(), Some(digest.clone()));

        let sidecar = fs::read_to_string(dir.path().join("a1.diff-doc.sha256")).unwrap();
        assert_eq!(sidecar, format!("{}  a1.diff-doc\n", digest));
    }
}
