//! Snapshot persistence.
//!
//! The [`PersistenceGateway`] writes `{layout, widgets}` to a local
//! key-value store, which is the source of truth, and hands the same body to
//! a [`RemoteMirror`] for best-effort replication. Reading a snapshot back
//! is guarded by the geometry signature: a snapshot taken under a different
//! `(rows, cols, slot count)` is never adopted, not even partially.
//!
//! Color-group membership and symbol selection are persisted next to the
//! snapshot under their own keys. External writes to any of the three keys
//! surface through [`PersistenceGateway::poll_changes`].

mod mirror;

pub use mirror::{DisabledMirror, HttpMirror, MirrorOutcome, RemoteMirror};

use crate::layout::{GeometrySignature, LayoutTemplate};
use crate::slots::SlotContent;
use crate::sync::{ColorMap, SelectionMap};
use kv_store::{ChangeFeed, KeyValueStore, StoreError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Key of the saved `{layout, widgets}` snapshot.
pub const SNAPSHOT_KEY: &str = "savedLayout";

/// Key of the widget to color-group map.
pub const COLORS_KEY: &str = "widgetColors";

/// Key of the widget to selected-symbol map.
pub const SELECTIONS_KEY: &str = "widgetStocks";

/// Persisted workspace snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Template the workspace was using.
    pub layout: LayoutTemplate,
    /// Slot contents in index order.
    pub widgets: Vec<SlotContent>,
}

impl Snapshot {
    /// Signature compared against the live layout.
    ///
    /// The slot count is the length of the stored widget array.
    pub fn signature(&self) -> GeometrySignature {
        GeometrySignature {
            rows: self.layout.rows,
            cols: self.layout.cols,
            slot_count: self.widgets.len(),
        }
    }
}

/// Why no snapshot was restored.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing saved, or the saved entry expired.
    #[error("no saved layout")]
    NotFound,

    /// Saved under a different layout shape.
    #[error("saved layout {found} does not match the current layout {expected}")]
    ShapeMismatch {
        /// Live signature.
        expected: GeometrySignature,
        /// Signature of the stored snapshot.
        found: GeometrySignature,
    },

    /// Stored value is not valid JSON of the expected shape.
    #[error("saved value under '{key}' is malformed: {message}")]
    Malformed {
        /// Store key.
        key: &'static str,
        /// Parser message.
        message: String,
    },

    /// The store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why the local write did not happen.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Value could not be encoded.
    #[error("failed to encode '{key}': {message}")]
    Serialize {
        /// Store key.
        key: &'static str,
        /// Encoder message.
        message: String,
    },

    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session has no store attached.
    #[error("no persistent store attached")]
    NoStore,
}

/// Confirmation of a local snapshot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Sequence number shared with the matching [`MirrorOutcome`].
    pub sequence: u64,
    /// Encoded size in bytes.
    pub bytes: usize,
}

/// A key that changed outside this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalChange {
    /// The saved snapshot.
    Snapshot,
    /// The color-group map.
    Colors,
    /// The selection map.
    Selections,
    /// Some unrelated key.
    Other(String),
}

impl ExternalChange {
    fn from_key(key: String) -> Self {
        match key.as_str() {
            SNAPSHOT_KEY => Self::Snapshot,
            COLORS_KEY => Self::Colors,
            SELECTIONS_KEY => Self::Selections,
            _ => Self::Other(key),
        }
    }
}

/// Local store plus change feed.
pub trait StoreBackend: KeyValueStore + ChangeFeed {}

impl<T: KeyValueStore + ChangeFeed> StoreBackend for T {}

/// Reads and writes workspace state through a local store and a mirror.
pub struct PersistenceGateway {
    store: Arc<dyn StoreBackend>,
    mirror: Box<dyn RemoteMirror>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl PersistenceGateway {
    /// Gateway over `store`, replicating snapshots to `mirror`.
    pub fn new(store: Arc<dyn StoreBackend>, mirror: Box<dyn RemoteMirror>) -> Self {
        Self {
            store,
            mirror,
            sequence: AtomicU64::new(0),
        }
    }

    /// Writes `{layout, widgets}` locally, then hands it to the mirror.
    ///
    /// The mirror attempt is made whether or not the local write succeeded
    /// and never changes the result; its outcome arrives on
    /// [`PersistenceGateway::mirror_outcomes`].
    ///
    /// # Errors
    ///
    /// [`SaveError`] if the snapshot could not be encoded or stored locally.
    pub fn save(
        &self,
        layout: &LayoutTemplate,
        widgets: &[SlotContent],
    ) -> Result<SaveReceipt, SaveError> {
        let snapshot = Snapshot {
            layout: layout.clone(),
            widgets: widgets.to_vec(),
        };
        let body = encode(SNAPSHOT_KEY, &snapshot)?;
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let bytes = body.len();

        let local = self.store.set(SNAPSHOT_KEY, &body);
        self.mirror.replicate(sequence, body);

        match local {
            Ok(()) => {
                tracing::info!(sequence, bytes, "layout saved");
                Ok(SaveReceipt { sequence, bytes })
            }
            Err(e) => {
                tracing::warn!(sequence, error = %e, "local layout save failed");
                Err(e.into())
            }
        }
    }

    /// Reads the saved snapshot if it fits a layout with signature `live`.
    ///
    /// # Errors
    ///
    /// [`LoadError::NotFound`], [`LoadError::ShapeMismatch`] (nothing is
    /// adopted), [`LoadError::Malformed`] or [`LoadError::Store`].
    pub fn load(&self, live: GeometrySignature) -> Result<Vec<SlotContent>, LoadError> {
        let snapshot: Snapshot = self
            .read_json(SNAPSHOT_KEY)?
            .ok_or(LoadError::NotFound)?;
        let found = snapshot.signature();
        if found != live {
            tracing::debug!(%found, expected = %live, "saved layout shape differs");
            return Err(LoadError::ShapeMismatch {
                expected: live,
                found,
            });
        }
        Ok(snapshot.widgets)
    }

    /// Persists the color-group map.
    ///
    /// # Errors
    ///
    /// [`SaveError`] if encoding or the local write fails.
    pub fn save_colors(&self, colors: &ColorMap) -> Result<(), SaveError> {
        let body = encode(COLORS_KEY, colors)?;
        self.store.set(COLORS_KEY, &body)?;
        Ok(())
    }

    /// Persists the selection map.
    ///
    /// # Errors
    ///
    /// [`SaveError`] if encoding or the local write fails.
    pub fn save_selections(&self, selections: &SelectionMap) -> Result<(), SaveError> {
        let body = encode(SELECTIONS_KEY, selections)?;
        self.store.set(SELECTIONS_KEY, &body)?;
        Ok(())
    }

    /// Stored color-group map; empty when nothing is stored.
    ///
    /// # Errors
    ///
    /// [`LoadError::Malformed`] or [`LoadError::Store`].
    pub fn load_colors(&self) -> Result<ColorMap, LoadError> {
        Ok(self.read_json(COLORS_KEY)?.unwrap_or_default())
    }

    /// Stored selection map; empty when nothing is stored.
    ///
    /// # Errors
    ///
    /// [`LoadError::Malformed`] or [`LoadError::Store`].
    pub fn load_selections(&self) -> Result<SelectionMap, LoadError> {
        Ok(self.read_json(SELECTIONS_KEY)?.unwrap_or_default())
    }

    /// Keys written by someone else since the previous poll.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the store cannot be scanned.
    pub fn poll_changes(&self) -> Result<Vec<ExternalChange>, StoreError> {
        Ok(self
            .store
            .poll_changes()?
            .into_iter()
            .map(ExternalChange::from_key)
            .collect())
    }

    /// Sequence number of the most recent [`PersistenceGateway::save`]
    /// attempt, successful or not; 0 before the first.
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Subscribes to mirror outcomes.
    pub fn mirror_outcomes(&self) -> broadcast::Receiver<MirrorOutcome> {
        self.mirror.subscribe()
    }

    fn read_json<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, LoadError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| LoadError::Malformed {
                key,
                message: e.to_string(),
            })
    }
}

fn encode<T: Serialize>(key: &'static str, value: &T) -> Result<String, SaveError> {
    serde_json::to_string(value).map_err(|e| SaveError::Serialize {
        key,
        message: e.to_string(),
    })
}
