//! In-place sorting of JSON change-list and difference-entry files.
//!
//! The file is rewritten atomically. With a backup, the original is copied to
//! `<file>.bak` first and copied back if anything after that fails.

#![allow(clippy::result_large_err)]

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use recon_core::errors::ExError;
use recon_core::logging_facility::Logger;
use recon_core::sort::Sorter;
use recon_core::{log_op_end, log_op_error, log_op_start};
use serde_json::Value;

use crate::atomic::atomic_write;
use crate::errors::{invalid_json, io_error, unknown_layout, unsortable, Result};

/// Layout of the file being sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A list, or an object with `entries` and/or `changes` lists
    ChangeList,
    /// A list, or an object with an `entries` list and/or an `assets` list
    DiffEntries,
}

impl FileKind {
    fn keys(&self) -> &'static [&'static str] {
        match self {
            FileKind::ChangeList => &["entries", "changes"],
            FileKind::DiffEntries => &["entries", "assets"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortReport {
    pub path: PathBuf,
    /// Number of list elements sorted
    pub sorted: usize,
    pub backup: Option<PathBuf>,
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Sort a JSON file in place
///
/// # Errors
///
/// - `NotFound` / `Io` when the file cannot be read or written
/// - `Serialization` when it is not JSON
/// - `InvalidInput` when it holds no list this kind sorts
/// - `UncomparableKey` when the sorter refuses a list; the file is untouched
pub fn sort_file(
    path: &Path,
    kind: FileKind,
    sorter: &Sorter<'_>,
    logger: &Logger,
    backup: bool,
) -> Result<SortReport> {
    logger.in_scope(|| {
        log_op_start!("sort_file", path = %path.display());
    });
    let start = std::time::Instant::now();

    let outcome = sort_with_backup(path, kind, sorter, backup);

    logger.in_scope(|| match &outcome {
        Ok(report) => {
            log_op_end!(
                "sort_file",
                duration_ms = start.elapsed().as_millis() as u64,
                entry_count = report.sorted
            );
        }
        Err(e) => {
            log_op_error!(
                "sort_file",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    });
    outcome
}

fn sort_with_backup(
    path: &Path,
    kind: FileKind,
    sorter: &Sorter<'_>,
    backup: bool,
) -> Result<SortReport> {
    if !path.exists() {
        return Err(io_error(
            "sort_file",
            path,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }

    let backup = if backup {
        let bak = backup_path(path);
        fs::copy(path, &bak).map_err(|e| io_error("backup", &bak, e))?;
        Some(bak)
    } else {
        None
    };

    match rewrite_sorted(path, kind, sorter) {
        Ok(sorted) => Ok(SortReport {
            path: path.to_path_buf(),
            sorted,
            backup,
        }),
        Err(e) => {
            if let Some(bak) = &backup {
                restore(bak, path, &e)?;
            }
            Err(e)
        }
    }
}

fn restore(bak: &Path, path: &Path, cause: &ExError) -> Result<()> {
    fs::copy(bak, path).map(|_| ()).map_err(|e| {
        io_error("restore_backup", path, e)
            .with_message(format!("restore after failed sort ({}) also failed", cause))
    })
}

fn rewrite_sorted(path: &Path, kind: FileKind, sorter: &Sorter<'_>) -> Result<usize> {
    let text = fs::read_to_string(path).map_err(|e| io_error("sort_file", path, e))?;
    let mut data: Value = serde_json::from_str(&text).map_err(|e| invalid_json("sort_file", path, e))?;

    let sorted = match &mut data {
        Value::Array(items) => sort_list(path, kind, "entries", items, sorter)?,
        Value::Object(map) => {
            let mut sorted = 0;
            let mut found = false;
            for key in kind.keys() {
                if let Some(Value::Array(items)) = map.get_mut(*key) {
                    found = true;
                    sorted += sort_list(path, kind, key, items, sorter)?;
                }
            }
            if !found {
                return Err(unknown_layout(path, &layout_text(kind)));
            }
            sorted
        }
        _ => return Err(unknown_layout(path, &layout_text(kind))),
    };

    let mut out = serde_json::to_string_pretty(&data).map_err(|e| invalid_json("sort_file", path, e))?;
    out.push('\n');
    atomic_write(path, out.as_bytes())?;
    Ok(sorted)
}

fn layout_text(kind: FileKind) -> String {
    let keys: Vec<String> = kind.keys().iter().map(|k| format!("'{}'", k)).collect();
    format!("a list, or an object with {} lists", keys.join(" or "))
}

fn sort_list(
    path: &Path,
    kind: FileKind,
    key: &str,
    items: &mut Vec<Value>,
    sorter: &Sorter<'_>,
) -> Result<usize> {
    let taken = std::mem::take(items);
    let outcome = match (kind, key) {
        (FileKind::ChangeList, _) => sorter.sort_change_list(taken),
        (FileKind::DiffEntries, "assets") => sorter.sort_json_assets(taken),
        (FileKind::DiffEntries, _) => sorter.sort_diff_entries(taken),
    };
    *items = outcome.items;
    match outcome.anomaly {
        Some(reason) => Err(unsortable(path, reason)),
        None => Ok(items.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/data/changes.json")),
            PathBuf::from("/data/changes.json.bak")
        );
    }

    #[test]
    fn test_layout_text() {
        assert_eq!(
            layout_text(FileKind::ChangeList),
            "a list, or an object with 'entries' or 'changes' lists"
        );
    }
}
