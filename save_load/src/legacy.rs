//! Import path for the older one-key-per-fact layout.
//!
//! Keys look like `quest_<id>_completed`, `skill_<id>_completed`,
//! `file_<questId>_uploaded`, `darkMode` and `theme`. They are read once,
//! folded into a snapshot by the caller and then removed.

use {
    crate::{SnapshotStorage, StorageError},
    bevy::prelude::*,
    std::collections::{BTreeMap, BTreeSet},
};

const DARK_MODE_KEY: &str = "darkMode";
const THEME_KEY: &str = "theme";

/// Everything found in the per-key layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyRecords {
    pub completed_quests: BTreeSet<String>,
    /// Cached skill flags. Only used to cross-check the recomputed unlocks.
    pub completed_skills: BTreeSet<String>,
    pub uploads: BTreeMap<String, String>,
    pub dark_mode: Option<bool>,
    /// Every storage key that contributed, removed after a successful import.
    pub keys: Vec<String>,
}

impl LegacyRecords {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A storage key that belongs to the per-key layout.
enum LegacyKey<'k> {
    QuestCompleted(&'k str),
    SkillCompleted(&'k str),
    FileUploaded(&'k str),
    DarkMode,
    Theme,
}

impl<'k> LegacyKey<'k> {
    fn classify(key: &'k str) -> Option<Self> {
        if let Some(quest_id) = flag_id(key, "quest_", "_completed") {
            Some(Self::QuestCompleted(quest_id))
        } else if let Some(skill_id) = flag_id(key, "skill_", "_completed") {
            Some(Self::SkillCompleted(skill_id))
        } else if let Some(quest_id) = flag_id(key, "file_", "_uploaded") {
            Some(Self::FileUploaded(quest_id))
        } else if key == DARK_MODE_KEY {
            Some(Self::DarkMode)
        } else if key == THEME_KEY {
            Some(Self::Theme)
        } else {
            None
        }
    }
}

fn flag_id<'k>(key: &'k str, prefix: &str, suffix: &str) -> Option<&'k str> {
    key.strip_prefix(prefix)?
        .strip_suffix(suffix)
        .filter(|id| !id.is_empty())
}

/// Collects every per-key record. Keys outside the layout are never read, and
/// a single unreadable key is skipped with a warning.
pub(crate) fn read_legacy(storage: &dyn SnapshotStorage) -> Result<LegacyRecords, StorageError> {
    let mut records = LegacyRecords::default();
    let mut theme_dark = None;
    let mut flag_dark = None;

    for key in storage.keys()? {
        let Some(kind) = LegacyKey::classify(&key) else {
            continue;
        };
        let value = match storage.get_item(&key) {
            Ok(Some(value)) => value,
            Ok(None) => continue,
            Err(err) => {
                warn!(%key, %err, "Skipping unreadable legacy key");
                continue;
            }
        };

        match kind {
            LegacyKey::QuestCompleted(quest_id) => {
                if value == "true" {
                    records.completed_quests.insert(quest_id.to_owned());
                }
            }
            LegacyKey::SkillCompleted(skill_id) => {
                if value == "true" {
                    records.completed_skills.insert(skill_id.to_owned());
                }
            }
            LegacyKey::FileUploaded(quest_id) => {
                records.uploads.insert(quest_id.to_owned(), value);
            }
            LegacyKey::DarkMode => flag_dark = Some(value == "true"),
            LegacyKey::Theme => theme_dark = Some(value == "dark"),
        }

        trace!(%key, "Found legacy progress key");
        records.keys.push(key);
    }

    records.dark_mode = theme_dark.or(flag_dark);
    Ok(records)
}

pub(crate) fn clear_legacy(
    storage: &mut dyn SnapshotStorage,
    records: &LegacyRecords,
) -> Result<(), StorageError> {
    for key in &records.keys {
        storage.remove_item(key)?;
    }
    info!(removed = records.keys.len(), "Removed legacy progress keys");
    Ok(())
}
