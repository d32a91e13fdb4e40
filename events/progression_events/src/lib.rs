use bevy::prelude::*;

// --- Requests ---

/// Represents a request to mark a quest as completed.
///
/// This **Observer** event (triggered via `commands.trigger`) is the bridge between user
/// input and the progression store.
///
/// # Observers
/// - `progression`: Checks the quest is known and not blocked (already completed, missing
///   upload, boss not ready), awards XP, persists, then triggers [`QuestCompleted`],
///   [`LevelUp`], [`SkillUnlocked`] and [`BossReady`] as applicable. Triggers
///   [`ActionRejected`] instead when the quest cannot be completed.
#[derive(Event, Debug, Clone)]
pub struct CompleteQuestRequest {
    pub quest_id: String,
}

/// Represents a simulated file upload for a quest that takes one.
///
/// # Observers
/// - `progression`: Records the file name and triggers [`UploadRecorded`]. Never completes
///   the quest on its own.
#[derive(Event, Debug, Clone)]
pub struct RecordUploadRequest {
    pub quest_id: String,
    pub file_name: String,
}

/// A learning resource was worked through.
#[derive(Event, Debug, Clone, Default)]
pub struct CompleteResourceRequest;

/// The player moved to another roadmap section.
#[derive(Event, Debug, Clone)]
pub struct NavigateRequest {
    pub section_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct SetDarkModeRequest {
    pub enabled: bool,
}

// --- Outcomes ---

/// Fired after a quest was completed and the new state was persisted.
#[derive(Event, Debug, Clone)]
pub struct QuestCompleted {
    pub quest_id: String,
    pub xp_awarded: u64,
    pub quests_completed: u32,
}

/// Fired once per level gained, in ascending order.
#[derive(Event, Debug, Clone)]
pub struct LevelUp {
    pub new_level: u32,
    pub xp_to_next_level: u64,
}

/// Fired when a skill went from locked to unlocked.
#[derive(Event, Debug, Clone)]
pub struct SkillUnlocked {
    pub skill_id: String,
    pub display_name: Option<String>,
}

/// Fired when every skill a boss quest requires became unlocked.
#[derive(Event, Debug, Clone)]
pub struct BossReady {
    pub quest_id: String,
    pub display_name: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct UploadRecorded {
    pub quest_id: String,
    pub file_name: String,
    /// File name this upload replaced, if any.
    pub replaced: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct ResourceCompleted {
    pub resources_completed: u32,
}

#[derive(Event, Debug, Clone)]
pub struct SectionChanged {
    pub section_id: String,
    pub progress_percent: u8,
}

#[derive(Event, Debug, Clone)]
pub struct DarkModeChanged {
    pub enabled: bool,
}

/// Which request an [`ActionRejected`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedAction {
    CompleteQuest,
    RecordUpload,
    Navigate,
}

/// A request was refused. State is unchanged.
#[derive(Event, Debug, Clone)]
pub struct ActionRejected {
    pub action: RejectedAction,
    /// Quest or section the request named.
    pub target: String,
    pub reason: String,
}

/// A mutation was applied in memory but could not be written to storage.
#[derive(Event, Debug, Clone)]
pub struct SaveFailed {
    pub reason: String,
}
