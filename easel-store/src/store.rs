//! The embedded, keyed artwork store.
//!
//! Holds every durable [`Artwork`] record under an auto-incrementing
//! integer key, optionally persisted to a data directory as one JSON
//! document. Views never use this type directly; they go through the
//! remote-call interface in [`crate::service`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::artwork::{Artwork, ArtworkPatch};
use crate::error::{StoreError, StoreResult};

/// File holding the persisted records and the id counter.
const STORE_FILE: &str = "artworks.json";

/// On-disk layout: the id counter travels with the records so a restarted
/// store never reuses a key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    next_id: u64,
    artworks: Vec<Artwork>,
}

#[derive(Debug)]
struct Inner {
    next_id: u64,
    records: BTreeMap<u64, Artwork>,
}

/// Keyed artwork storage with auto-incrementing ids.
#[derive(Debug, Clone)]
pub struct ArtworkStore {
    inner: Arc<RwLock<Inner>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl ArtworkStore {
    /// Create an empty in-memory store (no persistence).
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            })),
            data_dir: None,
        }
    }

    /// Open a store persisted under `data_dir`, loading any existing
    /// records. The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the directory cannot be
    /// created or an existing store file cannot be read or parsed.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let path = data_dir.join(STORE_FILE);
        let inner = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            let doc: StoreDocument = serde_json::from_str(&contents)
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            let records = doc
                .artworks
                .into_iter()
                .filter_map(|artwork| artwork.id.map(|id| (id, artwork)))
                .collect::<BTreeMap<_, _>>();
            let highest = records.keys().next_back().copied().unwrap_or(0);
            Inner {
                next_id: doc.next_id.max(highest + 1),
                records,
            }
        } else {
            Inner {
                next_id: 1,
                records: BTreeMap::new(),
            }
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(inner)),
            data_dir: Some(data_dir),
        })
    }

    /// All artworks, ordered by ascending id.
    #[must_use]
    pub fn list(&self) -> Vec<Artwork> {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.records.values().cloned().collect()
    }

    /// Create a record with a fresh id. `modified_at` starts equal to
    /// `created_at`. Ids are monotonically increasing and never reused.
    #[must_use]
    pub fn create(&self, title: impl Into<String>, created_at: u64) -> Artwork {
        let artwork = {
            let mut inner = self
                .inner
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let id = inner.next_id;
            inner.next_id += 1;
            let mut artwork = Artwork::new(title, created_at);
            artwork.id = Some(id);
            inner.records.insert(id, artwork.clone());
            artwork
        };
        self.persist();
        artwork
    }

    /// The record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn get(&self, id: u64) -> StoreResult<Artwork> {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Merge `patch` over the record for `id` and return the refreshed
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn update(&self, id: u64, patch: ArtworkPatch) -> StoreResult<Artwork> {
        let updated = {
            let mut inner = self
                .inner
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let record = inner.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            patch.apply(record);
            record.clone()
        };
        self.persist();
        Ok(updated)
    }

    /// Delete the record for `id` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn remove(&self, id: u64) -> StoreResult<Artwork> {
        let removed = {
            let mut inner = self
                .inner
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            inner.records.remove(&id).ok_or(StoreError::NotFound(id))?
        };
        self.persist();
        Ok(removed)
    }

    /// Write the whole store to disk.
    ///
    /// No-op without a data directory. A write failure is logged and does
    /// not fail the mutation that triggered it.
    fn persist(&self) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let doc = {
            let inner = self
                .inner
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            StoreDocument {
                next_id: inner.next_id,
                artworks: inner.records.values().cloned().collect(),
            }
        };
        let json = match serde_json::to_string_pretty(&doc) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize artwork store: {e}");
                return;
            }
        };
        let path = data_dir.join(STORE_FILE);
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!("Failed to persist artwork store to {}: {e}", path.display());
        }
    }
}

impl Default for ArtworkStore {
    fn default() -> Self {
        Self::new()
    }
}
