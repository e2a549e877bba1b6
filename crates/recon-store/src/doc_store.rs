//! Directory of `.diff-doc` files, one per asset.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use recon_core::document::{parse_document, write_document, DifferenceDocument, ParsedDocument};
use recon_core::errors::{ExError, ExErrorKind};
use recon_core::logging_facility::Logger;
use recon_core::sort::natural_sort_key;
use recon_core::validate::sha256_hex;
use recon_core::{log_op_end, log_op_error, log_op_start};
use recon_core_types::schema::DIFF_DOC_EXTENSION;

use crate::atomic::atomic_write;
use crate::checksum::write_checksum;
use crate::errors::{io_error, Result};

/// File stem for an asset id: anything outside `[A-Za-z0-9._-]` becomes `_`
pub fn sanitize_id(asset_id: &str) -> String {
    let stem: String = asset_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

/// Hex digits of the id hash appended to a sanitized stem
const STEM_HASH_LEN: usize = 8;

/// File stem for an asset id
///
/// An id that is already a safe stem is used as is. Otherwise the sanitized
/// form gets `-<hash prefix>` so that ids sanitizing alike stay apart.
pub fn document_stem(asset_id: &str) -> String {
    let stem = sanitize_id(asset_id);
    if stem == asset_id {
        stem
    } else {
        let digest = sha256_hex(asset_id.as_bytes());
        format!("{}-{}", stem, &digest[..STEM_HASH_LEN])
    }
}

#[derive(Debug)]
pub struct DocumentStore<'a> {
    root: PathBuf,
    logger: &'a Logger,
}

impl<'a> DocumentStore<'a> {
    pub fn new(root: impl Into<PathBuf>, logger: &'a Logger) -> Self {
        Self {
            root: root.into(),
            logger,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, asset_id: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", document_stem(asset_id), DIFF_DOC_EXTENSION))
    }

    /// Write one document atomically plus its checksum sidecar
    pub fn write(&self, doc: &DifferenceDocument) -> Result<PathBuf> {
        let path = self.path_for(&doc.asset_id);
        atomic_write(&path, write_document(doc).as_bytes())?;
        write_checksum(&path)?;
        Ok(path)
    }

    /// Write every document; nothing is written when two of them would share a file
    ///
    /// # Errors
    ///
    /// `InvalidInput` naming both asset ids when their paths coincide, or the
    /// first write error.
    pub fn write_all(&self, docs: &[DifferenceDocument]) -> Result<Vec<PathBuf>> {
        self.logger.in_scope(|| {
            log_op_start!("write_documents", entry_count = docs.len());
            let start = std::time::Instant::now();

            let written = self
                .claim_paths(docs)
                .and_then(|_| docs.iter().map(|doc| self.write(doc)).collect::<Result<Vec<_>>>())
                .map_err(|e| {
                    log_op_error!(
                        "write_documents",
                        e.clone(),
                        duration_ms = start.elapsed().as_millis() as u64
                    );
                    e
                })?;

            log_op_end!(
                "write_documents",
                duration_ms = start.elapsed().as_millis() as u64,
                entry_count = written.len()
            );
            Ok(written)
        })
    }

    fn claim_paths(&self, docs: &[DifferenceDocument]) -> Result<()> {
        let mut owners: BTreeMap<PathBuf, &str> = BTreeMap::new();
        for doc in docs {
            let path = self.path_for(&doc.asset_id);
            if let Some(owner) = owners.insert(path.clone(), &doc.asset_id) {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("write_documents")
                    .with_asset_id(doc.asset_id.as_str())
                    .with_path(path.display().to_string())
                    .with_message(format!("same document file as asset {}", owner)));
            }
        }
        Ok(())
    }

    /// `.diff-doc` files in natural order of their stems
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|e| io_error("list_documents", &self.root, e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(DIFF_DOC_EXTENSION)
            })
            .collect();
        paths.sort_by_cached_key(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (natural_sort_key(Some(stem.as_str())), path.clone())
        });
        Ok(paths)
    }

    pub fn load(&self, path: &Path) -> Result<ParsedDocument> {
        let text = fs::read_to_string(path).map_err(|e| io_error("load_document", path, e))?;
        parse_document(&text).map_err(|e| e.with_path(path.display().to_string()))
    }

    /// Every stored document in natural `asset_id` order
    pub fn load_all(&self) -> Result<Vec<ParsedDocument>> {
        self.logger.in_scope(|| {
            log_op_start!("load_documents", path = %self.root.display());
            let start = std::time::Instant::now();

            let mut docs = self
                .list()
                .and_then(|paths| paths.iter().map(|p| self.load(p)).collect::<Result<Vec<_>>>())
                .map_err(|e| {
                    log_op_error!(
                        "load_documents",
                        e.clone(),
                        duration_ms = start.elapsed().as_millis() as u64
                    );
                    e
                })?;
            docs.sort_by_cached_key(|doc| natural_sort_key(Some(doc.asset_id.as_str())));

            log_op_end!(
                "load_documents",
                duration_ms = start.elapsed().as_millis() as u64,
                entry_count = docs.len()
            );
            Ok(docs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("web-01.example"), "web-01.example");
        assert_eq!(sanitize_id("rack 4/slot#2"), "rack_4_slot_2");
        assert_eq!(sanitize_id("../etc"), ".._etc");
        assert_eq!(sanitize_id(""), "_");
    }

    #[test]
    fn test_document_stem() {
        assert_eq!(document_stem("web-01.example"), "web-01.example");
        let spaced = document_stem("rack 1");
        let slashed = document_stem("rack/1");
        assert!(spaced.starts_with("rack_1-"));
        assert_eq!(spaced.len(), "rack_1-".len() + STEM_HASH_LEN);
        assert_ne!(spaced, slashed);
        assert_ne!(spaced, "rack_1");
    }

    #[test]
    fn test_path_for() {
        let logger = Logger::disabled();
        let store = DocumentStore::new("/tmp/docs", &logger);
        assert_eq!(store.path_for("a1"), PathBuf::from("/tmp/docs/a1.diff-doc"));
        let path = store.path_for("a 1");
        assert!(path.starts_with("/tmp/docs"));
        assert!(path.to_string_lossy().ends_with(".diff-doc"));
    }
}
