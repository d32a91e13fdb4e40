//! Pure state transitions.
//!
//! Every function takes the state it changes explicitly and never touches
//! storage. On `Err` the state is left exactly as it was.

use {
    crate::ProgressionError,
    bevy::prelude::*,
    growth::ThresholdGrowth,
    progression_components::{PlayerState, RoadmapState},
    roadmap_assets::{QuestKind, RoadmapCatalog},
    save_load::LegacyRecords,
    unlock_rules::UnlockReport,
};

/// Result of a successful quest completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCompletion {
    pub quest_id: String,
    pub kind: QuestKind,
    pub xp_awarded: u64,
    /// Every level reached by this completion, ascending. Empty when no level was gained.
    pub levels_reached: Vec<LevelReached>,
    pub newly_unlocked_skills: Vec<String>,
    pub newly_ready_bosses: Vec<String>,
}

/// One level crossed by [`apply_level_up`], with the threshold the player
/// held right after reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelReached {
    pub level: u32,
    pub xp_to_next_level: u64,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub quest_id: String,
    pub file_name: String,
    pub replaced: Option<String>,
    pub projects_uploaded: u32,
}

/// What [`normalize`] had to repair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub dropped_quests: Vec<String>,
    pub dropped_uploads: Vec<String>,
    pub added_quests: usize,
    pub levels_gained: u32,
    pub section_reset: bool,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_quests.is_empty()
            && self.dropped_uploads.is_empty()
            && self.added_quests == 0
            && self.levels_gained == 0
            && !self.section_reset
    }
}

/// Converts surplus XP into levels and returns every level gained.
///
/// Loops so a single large award can cross several thresholds. Each step
/// grows the threshold the player actually holds, so a saved threshold off
/// the catalog curve stays off it. A zero threshold is replaced by the one
/// `growth` gives for the current level.
pub fn apply_level_up(player: &mut PlayerState, growth: &ThresholdGrowth) -> Vec<LevelReached> {
    if player.xp_to_next_level == 0 {
        player.xp_to_next_level = growth.threshold_at(player.level.saturating_sub(1));
    }

    let mut reached = Vec::new();
    while player.xp >= player.xp_to_next_level && player.level < u32::MAX {
        player.xp -= player.xp_to_next_level;
        player.level += 1;
        player.xp_to_next_level = growth.next(player.xp_to_next_level);
        reached.push(LevelReached {
            level: player.level,
            xp_to_next_level: player.xp_to_next_level,
        });
    }
    reached
}

/// State for a player who has never saved, tracking every catalog quest.
pub fn fresh_state(catalog: &RoadmapCatalog) -> RoadmapState {
    let mut state = RoadmapState::new(
        catalog.quests().iter().map(|quest| quest.id.as_str()),
        catalog.default_section(),
    );
    state.player.xp_to_next_level = catalog.tuning().base_xp_to_next_level;
    state.player.skills_unlocked = UnlockReport::evaluate(catalog, &state.quests).unlocked_count();
    state
}

/// Brings a loaded state in line with `catalog` and the player invariants.
pub fn normalize(state: &mut RoadmapState, catalog: &RoadmapCatalog) -> NormalizeReport {
    let mut report = NormalizeReport {
        dropped_quests: state.quests.retain_ids(|id| catalog.quest(id).is_some()),
        dropped_uploads: state.uploads.retain_ids(|id| catalog.quest(id).is_some()),
        ..default()
    };

    for quest in catalog.quests() {
        if !state.quests.contains(&quest.id) {
            state.quests.track(&quest.id);
            report.added_quests += 1;
        }
    }

    let player = &mut state.player;
    player.level = player.level.max(1);
    player.quests_completed = state.quests.completed_count();
    report.levels_gained = apply_level_up(player, &catalog.tuning().xp_growth()).len() as u32;

    if !catalog.accepts_section(&state.current_section) {
        warn!(section = %state.current_section, "Tracked section is not in the catalog, resetting it");
        state.current_section = catalog.default_section().to_owned();
        report.section_reset = true;
    }

    refresh_unlock_count(state, catalog);

    if !report.dropped_quests.is_empty() {
        warn!(dropped = ?report.dropped_quests, "Dropped progress for quests the catalog no longer has");
    }
    report
}

/// Completes `quest_id`, awards its XP and reports what it unlocked.
pub fn complete_quest(
    state: &mut RoadmapState,
    catalog: &RoadmapCatalog,
    quest_id: &str,
) -> Result<QuestCompletion, ProgressionError> {
    let quest = catalog
        .quest(quest_id)
        .ok_or_else(|| ProgressionError::UnknownQuest(quest_id.to_owned()))?;

    if let Some(blocker) =
        unlock_rules::quest_blocker(catalog, quest, &state.quests, &state.uploads)
    {
        return Err(ProgressionError::Blocked {
            quest_id: quest_id.to_owned(),
            blocker,
        });
    }

    let before = UnlockReport::evaluate(catalog, &state.quests);
    state.quests.mark_completed(&quest.id);

    let tuning = catalog.tuning();
    let kind = quest.kind();
    let xp_awarded = unlock_rules::xp_reward(kind, &tuning.rewards);

    let player = &mut state.player;
    player.quests_completed = state.quests.completed_count();
    player.xp = player.xp.saturating_add(xp_awarded);
    let levels_reached = apply_level_up(player, &tuning.xp_growth());

    let after = UnlockReport::evaluate(catalog, &state.quests);
    state.player.skills_unlocked = after.unlocked_count();

    Ok(QuestCompletion {
        quest_id: quest.id.clone(),
        kind,
        xp_awarded,
        levels_reached,
        newly_unlocked_skills: after.newly_unlocked_skills(&before),
        newly_ready_bosses: after.newly_ready_bosses(&before),
    })
}

/// Records a simulated upload. Awards nothing; only lifts the upload blocker.
pub fn record_upload(
    state: &mut RoadmapState,
    catalog: &RoadmapCatalog,
    quest_id: &str,
    file_name: &str,
) -> Result<UploadReceipt, ProgressionError> {
    let quest = catalog
        .quest(quest_id)
        .ok_or_else(|| ProgressionError::UnknownQuest(quest_id.to_owned()))?;
    if !quest.requires_upload {
        return Err(ProgressionError::UploadNotAccepted(quest.id.clone()));
    }
    if state.quests.is_completed(&quest.id) {
        return Err(ProgressionError::UploadAfterCompletion(quest.id.clone()));
    }
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(ProgressionError::BlankFileName);
    }

    let replaced = state.uploads.record(&quest.id, file_name);
    state.player.projects_uploaded = state.player.projects_uploaded.saturating_add(1);

    Ok(UploadReceipt {
        quest_id: quest.id.clone(),
        file_name: file_name.to_owned(),
        replaced,
        projects_uploaded: state.player.projects_uploaded,
    })
}

/// Returns the new resource count.
pub fn record_resource_completed(state: &mut RoadmapState) -> u32 {
    let player = &mut state.player;
    player.resources_completed = player.resources_completed.saturating_add(1);
    player.resources_completed
}

/// Tracks `section_id` and returns its progress percentage.
pub fn set_current_section(
    state: &mut RoadmapState,
    catalog: &RoadmapCatalog,
    section_id: &str,
) -> Result<u8, ProgressionError> {
    if !catalog.accepts_section(section_id) {
        return Err(ProgressionError::UnknownSection(section_id.to_owned()));
    }
    state.current_section = section_id.to_owned();
    Ok(section_progress(catalog, section_id))
}

/// Returns `true` when the preference changed.
pub fn set_dark_mode(state: &mut RoadmapState, enabled: bool) -> bool {
    let changed = state.preferences.dark_mode != enabled;
    state.preferences.dark_mode = enabled;
    changed
}

/// Progress shown for a section the catalog does not list.
pub const DEFAULT_SECTION_PROGRESS: u8 = 10;

pub fn section_progress(catalog: &RoadmapCatalog, section_id: &str) -> u8 {
    catalog
        .section(section_id)
        .map(|section| section.progress_percent)
        .unwrap_or(DEFAULT_SECTION_PROGRESS)
}

/// Rebuilds a state from the per-key layout.
///
/// Completions are replayed in catalog order and their XP re-awarded, so the
/// result is the same as if the player had completed them one by one. Cached
/// skill flags are only compared against the recomputed unlocks.
pub fn import_legacy(catalog: &RoadmapCatalog, records: &LegacyRecords) -> RoadmapState {
    let mut state = fresh_state(catalog);
    let tuning = catalog.tuning();

    for quest in catalog.quests() {
        if !records.completed_quests.contains(&quest.id) {
            continue;
        }
        state.quests.mark_completed(&quest.id);
        let xp = unlock_rules::xp_reward(quest.kind(), &tuning.rewards);
        state.player.xp = state.player.xp.saturating_add(xp);
        apply_level_up(&mut state.player, &tuning.xp_growth());
    }

    for quest_id in &records.completed_quests {
        if catalog.quest(quest_id).is_none() {
            warn!(%quest_id, "Legacy completion names an unknown quest, skipping it");
        }
    }

    for (quest_id, file_name) in &records.uploads {
        if catalog.quest(quest_id).is_none() {
            warn!(%quest_id, "Legacy upload names an unknown quest, skipping it");
            continue;
        }
        state.uploads.record(quest_id, file_name);
    }
    state.player.projects_uploaded = state.uploads.len() as u32;
    state.player.quests_completed = state.quests.completed_count();

    if let Some(dark_mode) = records.dark_mode {
        state.preferences.dark_mode = dark_mode;
    }

    let report = refresh_unlock_count(&mut state, catalog);
    for skill_id in &records.completed_skills {
        if !report.is_skill_unlocked(skill_id) {
            warn!(%skill_id, "Legacy data marks a skill completed that its quests do not unlock");
        }
    }

    info!(
        quests = state.player.quests_completed,
        level = state.player.level,
        xp = state.player.xp,
        uploads = state.player.projects_uploaded,
        "Imported legacy progress"
    );
    state
}

fn refresh_unlock_count(state: &mut RoadmapState, catalog: &RoadmapCatalog) -> UnlockReport {
    let report = UnlockReport::evaluate(catalog, &state.quests);
    state.player.skills_unlocked = report.unlocked_count();
    report
}

