//! Session-scoped result store
//!
//! Processed outputs are cached across UI re-renders keyed by the
//! original file name, so downloads and previews survive without
//! reprocessing. Lifecycle is explicit: an entry appears on first
//! successful process and the store only empties on [`SessionStore::clear`].
//! There is deliberately no TTL or eviction — results must not vanish
//! mid-session.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

/// Handle to one processed document.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    /// Name of the uploaded/input file this entry was produced from.
    pub original_name: String,
    /// Where the cleaned PDF was written.
    pub output_path: PathBuf,
    /// Preview images, in page order; empty when previews were disabled
    /// or their generation failed.
    pub preview_paths: Vec<PathBuf>,
    pub pages_total: usize,
    pub pages_redacted: usize,
    pub text_ops_removed: usize,
    pub processed_at: DateTime<Utc>,
}

/// Concurrent map from original file name to its processed result.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: DashMap<String, Arc<ProcessedFile>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Records a processed file, replacing any previous result for the
    /// same original name.
    pub fn record(&self, entry: ProcessedFile) -> Arc<ProcessedFile> {
        let entry = Arc::new(entry);
        debug!(name = %entry.original_name, "session entry recorded");
        self.entries
            .insert(entry.original_name.clone(), Arc::clone(&entry));
        entry
    }

    pub fn get(&self, original_name: &str) -> Option<Arc<ProcessedFile>> {
        self.entries.get(original_name).map(|e| Arc::clone(&e))
    }

    /// All entries, sorted by original name for stable display order.
    pub fn entries(&self) -> Vec<Arc<ProcessedFile>> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();
        all.sort_by(|a, b| a.original_name.cmp(&b.original_name));
        all
    }

    /// Explicit reset; the only way entries leave the store.
    pub fn clear(&self) {
        debug!(count = self.entries.len(), "session store cleared");
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
