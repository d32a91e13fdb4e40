//! Persistence boundary for roadmap progress.
//!
//! This crate provides:
//! - A [`SnapshotStorage`] trait shaped like a browser's local storage, with
//!   in-memory and directory-backed implementations
//! - The canonical JSON snapshot stored under [`SNAPSHOT_KEY`]
//! - A one-time import path for the older per-key layout
//!
//! Reads never fail: a missing or unreadable snapshot is reported as "nothing
//! saved". Writes replace the whole snapshot at once.

mod legacy;
mod snapshot;
mod storage;

pub use {legacy::LegacyRecords, snapshot::*, storage::*};

use {
    bevy::prelude::*,
    progression_components::RoadmapState,
    snapshot::SnapshotRead,
};

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a load found in storage.
#[derive(Debug)]
pub enum LoadedProgress {
    /// A readable canonical snapshot. Not yet normalized against any catalog.
    Snapshot(RoadmapState),
    /// No usable snapshot, but per-key data that should be imported.
    Legacy(LegacyRecords),
    /// Nothing saved (or nothing readable).
    Fresh,
}

/// Owns the storage backend and knows the persisted layouts.
pub struct SaveLoad {
    storage: Box<dyn SnapshotStorage>,
}

impl SaveLoad {
    pub fn new(storage: impl SnapshotStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    pub fn storage(&self) -> &dyn SnapshotStorage {
        &*self.storage
    }

    pub fn storage_mut(&mut self) -> &mut dyn SnapshotStorage {
        &mut *self.storage
    }

    /// Reads saved progress. Never fails; problems are logged and read as [`LoadedProgress::Fresh`].
    pub fn load(&self) -> LoadedProgress {
        match snapshot::read_snapshot(self.storage()) {
            SnapshotRead::Found(state) => return LoadedProgress::Snapshot(state),
            SnapshotRead::Missing | SnapshotRead::Corrupt => {}
        }

        match legacy::read_legacy(self.storage()) {
            Ok(records) if !records.is_empty() => {
                info!(
                    quests = records.completed_quests.len(),
                    uploads = records.uploads.len(),
                    "Found progress in the per-key layout"
                );
                LoadedProgress::Legacy(records)
            }
            Ok(_) => LoadedProgress::Fresh,
            Err(err) => {
                warn!(%err, "Failed to scan for legacy progress, starting from defaults");
                LoadedProgress::Fresh
            }
        }
    }

    /// Replaces the stored snapshot with `state`.
    pub fn save(&mut self, state: &RoadmapState) -> Result<(), SaveError> {
        snapshot::write_snapshot(self.storage_mut(), state)
    }

    /// Deletes the per-key entries once their content lives in a snapshot.
    pub fn clear_legacy(&mut self, records: &LegacyRecords) -> Result<(), StorageError> {
        legacy::clear_legacy(self.storage_mut(), records)
    }
}

impl std::fmt::Debug for SaveLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveLoad").finish_non_exhaustive()
    }
}
