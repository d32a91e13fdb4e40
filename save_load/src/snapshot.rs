use {
    crate::{SaveError, SnapshotStorage},
    bevy::prelude::*,
    chrono::Utc,
    progression_components::RoadmapState,
    serde::{Deserialize, Serialize},
};

/// Storage key of the canonical snapshot.
pub const SNAPSHOT_KEY: &str = "roadmapState";

/// Layout version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The canonical persisted layout: one JSON object under [`SNAPSHOT_KEY`].
///
/// ```json
/// { "version": 1, "savedAt": "...", "player": {...}, "quests": {...},
///   "uploads": {...}, "currentSection": "...", "preferences": {...} }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapSnapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(flatten)]
    pub state: RoadmapState,
}

impl RoadmapSnapshot {
    pub fn new(state: RoadmapState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Some(Utc::now().to_rfc3339()),
            state,
        }
    }
}

/// Outcome of reading the snapshot key.
#[derive(Debug)]
pub(crate) enum SnapshotRead {
    Found(RoadmapState),
    Missing,
    /// Present but unreadable. Treated the same as missing by callers.
    Corrupt,
}

pub(crate) fn read_snapshot(storage: &dyn SnapshotStorage) -> SnapshotRead {
    let raw = match storage.get_item(SNAPSHOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SnapshotRead::Missing,
        Err(err) => {
            warn!(%err, "Failed to read saved progress, starting from defaults");
            return SnapshotRead::Corrupt;
        }
    };

    match serde_json::from_str::<RoadmapSnapshot>(&raw) {
        Ok(snapshot) => {
            if snapshot.version > SNAPSHOT_VERSION {
                warn!(
                    version = snapshot.version,
                    supported = SNAPSHOT_VERSION,
                    "Saved progress comes from a newer layout, reading known fields only"
                );
            }
            debug!(saved_at = ?snapshot.saved_at, "Read saved progress");
            SnapshotRead::Found(snapshot.state)
        }
        Err(err) => {
            warn!(%err, "Saved progress is not valid JSON, treating it as absent");
            SnapshotRead::Corrupt
        }
    }
}

pub(crate) fn write_snapshot(
    storage: &mut dyn SnapshotStorage,
    state: &RoadmapState,
) -> Result<(), SaveError> {
    let snapshot = RoadmapSnapshot::new(state.clone());
    let json = serde_json::to_string(&snapshot)?;
    storage.set_item(SNAPSHOT_KEY, &json)?;
    debug!(bytes = json.len(), "Saved progress");
    Ok(())
}
