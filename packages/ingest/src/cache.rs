//! Caller-owned cache of cleaned datasets.
//!
//! Re-reading and re-cleaning a large source on every view refresh is
//! wasteful, so callers can keep cleaned datasets in a [`DatasetCache`]
//! keyed by source identity. The cache never expires or refreshes entries on
//! its own; callers [`invalidate`](DatasetCache::invalidate) explicitly.

use std::collections::BTreeMap;
use std::sync::Arc;

use sha2::{Digest as _, Sha256};

use crate::SourceError;
use crate::pipeline::CleanDataset;
use crate::progress::ProgressCallback;
use crate::source::{
    LoadOptions, SourceLocation, clean_source_bytes, fetch_source, load_clean_dataset,
};

/// Identity of a cached source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKey {
    /// Keyed by where the source was loaded from.
    Location(String),
    /// Keyed by the SHA-256 of the source bytes (hex).
    ContentHash(String),
}

impl SourceKey {
    /// Key for a source location.
    #[must_use]
    pub fn for_location(location: &SourceLocation) -> Self {
        Self::Location(location.to_string())
    }

    /// Key for raw source content.
    #[must_use]
    pub fn for_content(bytes: &[u8]) -> Self {
        Self::ContentHash(hex::encode(Sha256::digest(bytes)))
    }
}

/// Cleaned datasets by source identity.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: BTreeMap<SourceKey, Arc<CleanDataset>>,
}

impl DatasetCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached dataset for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &SourceKey) -> Option<Arc<CleanDataset>> {
        self.entries.get(key).cloned()
    }

    /// Stores a dataset, replacing any previous entry for `key`.
    pub fn insert(&mut self, key: SourceKey, dataset: CleanDataset) -> Arc<CleanDataset> {
        let dataset = Arc::new(dataset);
        self.entries.insert(key, Arc::clone(&dataset));
        dataset
    }

    /// Drops the entry for `key`. Returns whether one existed.
    pub fn invalidate(&mut self, key: &SourceKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            log::debug!("Invalidated cached dataset {key:?}");
        }
        removed
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the dataset cached under the location, loading and caching it
    /// on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source has to be loaded and cannot be.
    /// Failed loads are not cached.
    pub async fn get_or_load(
        &mut self,
        location: &SourceLocation,
        options: &LoadOptions,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Arc<CleanDataset>, SourceError> {
        let key = SourceKey::for_location(location);
        if let Some(dataset) = self.get(&key) {
            log::debug!("Using cached dataset for {location}");
            return Ok(dataset);
        }

        let dataset = load_clean_dataset(location, options, progress).await?;
        Ok(self.insert(key, dataset))
    }

    /// Fetches the source bytes and returns the dataset cached under their
    /// content hash, cleaning and caching on a miss. Unlike
    /// [`get_or_load`](Self::get_or_load) this notices when the content
    /// behind a location changes, at the cost of always fetching.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source cannot be fetched or parsed.
    pub async fn get_or_load_by_content(
        &mut self,
        location: &SourceLocation,
        options: &LoadOptions,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Arc<CleanDataset>, SourceError> {
        let bytes = fetch_source(location, options).await?;
        let key = SourceKey::for_content(&bytes);
        if let Some(dataset) = self.get(&key) {
            log::debug!("Content of {location} unchanged, using cached dataset");
            return Ok(dataset);
        }

        let dataset = clean_source_bytes(&bytes, &location.to_string(), options, progress)?;
        Ok(self.insert(key, dataset))
    }
}
