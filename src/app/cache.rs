// ShipSearch - app/cache.rs
//
// Memoised dataset loading keyed by file identity and content.
//
// Each lookup reads the file bytes and hashes them (SHA-256); decoding and
// normalisation are skipped when the digest matches the cached entry. A
// changed file, or a different load-time normalisation mode, invalidates
// the entry for that path.

use crate::app::loader;
use crate::core::model::Table;
use crate::core::policy::{ColumnPolicy, NumericSuffixMode};
use crate::util::error::LoadError;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
struct CachedDataset {
    digest: String,
    mode: NumericSuffixMode,
    table: Arc<Table>,
}

/// Loaded tables, shared read-only with every pipeline run.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CachedDataset>,
    hits: u64,
    misses: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `path`, decoding it only if its content changed
    /// since the last call.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        policy: &ColumnPolicy,
    ) -> Result<Arc<Table>, LoadError> {
        let bytes = loader::read_source(path)?;
        let digest = content_digest(&bytes);
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        if let Some(entry) = self.entries.get(&key) {
            if entry.digest == digest && entry.mode == policy.numeric_suffix_mode {
                self.hits += 1;
                tracing::debug!(path = %key.display(), "Dataset cache hit");
                return Ok(Arc::clone(&entry.table));
            }
            tracing::info!(path = %key.display(), "Dataset changed; reloading");
        }

        self.misses += 1;
        let table = Arc::new(loader::load_from_bytes(path, &bytes, policy)?);
        self.entries.insert(
            key,
            CachedDataset {
                digest,
                mode: policy.numeric_suffix_mode,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

/// Hex-encoded SHA-256 of the file content.
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
