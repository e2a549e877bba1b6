//! Checksum and cache-directory integrity checks.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use recon_core_types::schema::CHECKSUM_EXTENSION;
use sha2::{Digest, Sha256};

use crate::errors::ExErrorKind;
use crate::validate::result::{ValidationIssue, ValidationResult};
use crate::validate::schema::check_timestamp;
use crate::validate::structural::critical;

/// Old cache files named in metadata
const MAX_LISTED_OLD: usize = 5;

/// Hex SHA-256 of raw bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Path of the checksum sidecar for `path` (`<file>.sha256`)
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(CHECKSUM_EXTENSION);
    PathBuf::from(name)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Recompute the file's hash and compare it with `expected`
///
/// A mismatch or an unreadable file is a non-critical integrity error.
pub fn verify_checksum(path: &Path, expected: &str, result: &mut ValidationResult) {
    let name = file_name(path);
    match std::fs::read(path) {
        Ok(bytes) => {
            let matches = sha256_hex(&bytes).eq_ignore_ascii_case(expected.trim());
            result.add_check(matches);
            if !matches {
                result.add_error(
                    ValidationIssue::new(
                        ExErrorKind::Integrity,
                        format!("Checksum mismatch for {}", name),
                    ),
                    false,
                );
            }
        }
        Err(e) => result.add_error(
            ValidationIssue::new(
                ExErrorKind::Integrity,
                format!("Checksum verification failed for {}: {}", name, e),
            ),
            false,
        ),
    }
}

/// Expected hash from a sidecar: its first whitespace-separated token
fn read_sidecar(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|text| text.split_whitespace().next().map(str::to_string))
}

fn is_cache_file(path: &Path) -> bool {
    path.is_file()
        && matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("json") | Some("cache")
        )
}

/// Scan `dir` for `*.json` / `*.cache` files in name order
///
/// Each file must parse as JSON; a top-level `timestamp` must be ISO-8601;
/// a `<file>.sha256` sidecar is verified; files older than `max_age` warn.
pub fn check_cache_dir(dir: &Path, max_age: Duration, result: &mut ValidationResult) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            critical(
                result,
                ExErrorKind::NotFound,
                format!("Cache directory not found: {}", dir.display()),
            );
            return;
        }
        Err(e) => {
            critical(
                result,
                ExErrorKind::Io,
                format!("Cannot read cache directory {}: {}", dir.display(), e),
            );
            return;
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_cache_file(path))
        .collect();
    files.sort();
    result.add_info(format!("Found {} cache files", files.len()));

    for path in &files {
        check_cache_file(path, result);
    }

    let now = SystemTime::now();
    let old: Vec<String> = files
        .iter()
        .filter(|path| {
            std::fs::metadata(path)
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > max_age)
        })
        .map(|path| file_name(path))
        .collect();
    if !old.is_empty() {
        result.add_warning(ValidationIssue::new(
            ExErrorKind::Integrity,
            format!(
                "{} cache files older than {} hours",
                old.len(),
                max_age.as_secs() / 3600
            ),
        ));
        let listed: Vec<&String> = old.iter().take(MAX_LISTED_OLD).collect();
        result.set_metadata("old_cache_files", serde_json::json!(listed));
    }
}

fn check_cache_file(path: &Path, result: &mut ValidationResult) {
    let name = file_name(path);
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            result.add_error(
                ValidationIssue::new(
                    ExErrorKind::Integrity,
                    format!("Cannot read cache file {}: {}", name, e),
                ),
                false,
            );
            return;
        }
    };
    let data: serde_json::Value = match serde_json::from_str(&text) {
        Ok(data) => data,
        Err(_) => {
            result.add_error(
                ValidationIssue::new(
                    ExErrorKind::Integrity,
                    format!("Corrupted cache file: {}", name),
                ),
                false,
            );
            return;
        }
    };
    result.add_check(true);

    if let Some(timestamp) = data.get("timestamp") {
        check_timestamp(timestamp, &name, None, result);
    }
    if let Some(expected) = read_sidecar(&sidecar_path(path)) {
        verify_checksum(path, &expected, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::result::ValidationStatus;
    use tempfile::TempDir;

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/a.json")),
            PathBuf::from("/tmp/a.json.sha256")
        );
    }

    #[test]
    fn test_checksum_mismatch_is_an_error_not_a_panic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, b"{}").unwrap();

        let mut result = ValidationResult::new("t");
        verify_checksum(&path, &sha256_hex(b"{}"), &mut result);
        assert_eq!(result.status(), ValidationStatus::Passed);

        verify_checksum(&path, "deadbeef", &mut result);
        assert_eq!(result.status(), ValidationStatus::Failed);
        assert!(!result.has_critical());
        assert!(result.has_issue(ExErrorKind::Integrity));
    }

    #[test]
    fn test_cache_dir_scan() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("good.json"), r#"{"timestamp": "2026-01-26T10:00:00Z"}"#).unwrap();
        std::fs::write(dir.path().join("bad.cache"), "not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("good.json.sha256"), "0000 good.json\n").unwrap();

        let mut result = ValidationResult::new("cache");
        check_cache_dir(dir.path(), Duration::from_secs(3600), &mut result);

        assert_eq!(result.info, vec!["Found 2 cache files".to_string()]);
        let messages: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Corrupted cache file: bad.cache", "Checksum mismatch for good.json"]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_cache_dir_is_critical() {
        let dir = TempDir::new().unwrap();
        let mut result = ValidationResult::new("cache");
        check_cache_dir(&dir.path().join("absent"), Duration::from_secs(60), &mut result);
        assert!(result.has_critical());
        assert!(result.has_issue(ExErrorKind::NotFound));
    }
}
