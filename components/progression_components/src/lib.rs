//! State data model of the roadmap progression core.
//!
//! These types are plain data. Transitions live in the `progression` crate and
//! derived views are computed by `unlock_rules`; nothing here knows about the
//! catalog or about storage.

use {
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// XP needed for the first level-up.
pub const DEFAULT_XP_TO_NEXT_LEVEL: u64 = 1000;

/// Section shown when nothing else is tracked.
pub const DEFAULT_SECTION: &str = "starting-point";

/// Player level, XP and activity counters.
///
/// Deserialization falls back to [`Default`] per missing field, so a partial
/// persisted object is merged over the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerState {
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub quests_completed: u32,
    pub resources_completed: u32,
    pub projects_uploaded: u32,
    /// Cached count of unlocked skills, recomputed after every mutation.
    pub skills_unlocked: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: DEFAULT_XP_TO_NEXT_LEVEL,
            quests_completed: 0,
            resources_completed: 0,
            projects_uploaded: 0,
            skills_unlocked: 1,
        }
    }
}

/// One-way quest completion flags keyed by quest id.
///
/// A flag cannot be cleared once it is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestState(BTreeMap<String, bool>);

impl QuestState {
    /// Tracks every id in `quest_ids` as not completed.
    pub fn with_quests<I, S>(quest_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            quest_ids
                .into_iter()
                .map(|id| (id.into(), false))
                .collect(),
        )
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.0.get(quest_id).copied().unwrap_or(false)
    }

    pub fn contains(&self, quest_id: &str) -> bool {
        self.0.contains_key(quest_id)
    }

    /// Starts tracking `quest_id` as not completed. Existing flags are kept.
    pub fn track(&mut self, quest_id: &str) {
        self.0.entry(quest_id.to_owned()).or_insert(false);
    }

    /// Marks `quest_id` completed. Returns `false` when it already was.
    pub fn mark_completed(&mut self, quest_id: &str) -> bool {
        let flag = self.0.entry(quest_id.to_owned()).or_insert(false);
        let changed = !*flag;
        *flag = true;
        changed
    }

    pub fn completed_count(&self) -> u32 {
        self.0.values().filter(|&&done| done).count() as u32
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops every id rejected by `keep` and returns the dropped ids.
    pub fn retain_ids(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let dropped: Vec<String> = self
            .0
            .keys()
            .filter(|id| !keep(id))
            .cloned()
            .collect();
        for id in &dropped {
            self.0.remove(id);
        }
        dropped
    }
}

/// Simulated uploads: quest id to the name of the uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadLog(BTreeMap<String, String>);

impl UploadLog {
    /// Records `file_name` for `quest_id`, returning the file it replaced.
    pub fn record(&mut self, quest_id: &str, file_name: &str) -> Option<String> {
        self.0.insert(quest_id.to_owned(), file_name.to_owned())
    }

    pub fn file_for(&self, quest_id: &str) -> Option<&str> {
        self.0.get(quest_id).map(String::as_str)
    }

    pub fn has_upload(&self, quest_id: &str) -> bool {
        self.0.contains_key(quest_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn retain_ids(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let dropped: Vec<String> = self
            .0
            .keys()
            .filter(|id| !keep(id))
            .cloned()
            .collect();
        for id in &dropped {
            self.0.remove(id);
        }
        dropped
    }
}

/// Persisted presentation preferences. The core stores them and never reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub dark_mode: bool,
}

/// The whole canonical state: what gets persisted and what transitions mutate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoadmapState {
    pub player: PlayerState,
    pub quests: QuestState,
    pub uploads: UploadLog,
    pub current_section: String,
    pub preferences: Preferences,
}

impl Default for RoadmapState {
    fn default() -> Self {
        Self {
            player: PlayerState::default(),
            quests: QuestState::default(),
            uploads: UploadLog::default(),
            current_section: DEFAULT_SECTION.to_owned(),
            preferences: Preferences::default(),
        }
    }
}

impl RoadmapState {
    /// Fresh state tracking `quest_ids`, all incomplete, positioned at `section`.
    pub fn new<I, S>(quest_ids: I, section: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            quests: QuestState::with_quests(quest_ids),
            current_section: section.into(),
            ..Default::default()
        }
    }
}
