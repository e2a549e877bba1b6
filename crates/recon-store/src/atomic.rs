//! Atomic write primitives
//!
//! Uses temp→rename so readers never see a partial file

#![allow(clippy::result_large_err)]

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};

/// Sibling temp path: `<file>.tmp` in the same directory
fn temp_path(target_path: &Path) -> PathBuf {
    let mut name: OsString = target_path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Atomically write bytes to a file, creating parent directories
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error("create_dir", parent, e))?;
    }

    let temp = temp_path(target_path);
    fs::write(&temp, content).map_err(|e| io_error("write_temp", &temp, e))?;

    if let Err(e) = fs::rename(&temp, target_path) {
        let _ = fs::remove_file(&temp);
        return Err(io_error("rename_temp", target_path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("docs").join("a1.diff-doc");

        atomic_write(&target, b"asset_id: a1\n").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"asset_id: a1\n");
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("changes.json");

        atomic_write(&target, b"[]").unwrap();
        atomic_write(&target, b"[1]").unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["changes.json".to_string()]);
        assert_eq!(fs::read(&target).unwrap(), b"[1]");
    }
}
