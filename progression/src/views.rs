//! Read-only snapshots for presentation layers.

use {
    crate::transitions::section_progress,
    progression_components::RoadmapState,
    roadmap_assets::{QuestKind, RoadmapCatalog},
    serde::Serialize,
    unlock_rules::{QuestBlocker, UnlockReport},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub quests_completed: u32,
    pub resources_completed: u32,
    pub projects_uploaded: u32,
    pub skills_unlocked: u32,
    pub current_section: String,
    pub section_progress_percent: u8,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestView {
    pub id: String,
    pub name: String,
    pub kind: QuestKind,
    pub completed: bool,
    pub requires_upload: bool,
    pub uploaded_file: Option<String>,
    /// Why the quest cannot be completed yet. `None` when it can, or when it is done.
    pub blocker: Option<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillView {
    pub id: String,
    pub name: String,
    pub available: bool,
    pub unlocked: bool,
    pub completion_percent: f32,
}

pub(crate) fn player_summary(state: &RoadmapState, catalog: &RoadmapCatalog) -> PlayerSummary {
    let player = &state.player;
    PlayerSummary {
        level: player.level,
        xp: player.xp,
        xp_to_next_level: player.xp_to_next_level,
        quests_completed: player.quests_completed,
        resources_completed: player.resources_completed,
        projects_uploaded: player.projects_uploaded,
        skills_unlocked: player.skills_unlocked,
        current_section: state.current_section.clone(),
        section_progress_percent: section_progress(catalog, &state.current_section),
        dark_mode: state.preferences.dark_mode,
    }
}

pub(crate) fn quest_list(state: &RoadmapState, catalog: &RoadmapCatalog) -> Vec<QuestView> {
    catalog
        .quests()
        .iter()
        .map(|quest| {
            let completed = state.quests.is_completed(&quest.id);
            let blocker = unlock_rules::quest_blocker(catalog, quest, &state.quests, &state.uploads)
                .filter(|blocker| *blocker != QuestBlocker::AlreadyCompleted);
            let missing_skills = match &blocker {
                Some(QuestBlocker::BossNotReady { missing_skills }) => missing_skills.clone(),
                _ => Vec::new(),
            };

            QuestView {
                id: quest.id.clone(),
                name: quest.name().to_owned(),
                kind: quest.kind(),
                completed,
                requires_upload: quest.requires_upload,
                uploaded_file: state.uploads.file_for(&quest.id).map(str::to_owned),
                blocker: blocker.map(|blocker| blocker.to_string()),
                missing_skills,
            }
        })
        .collect()
}

pub(crate) fn skill_tree(state: &RoadmapState, catalog: &RoadmapCatalog) -> Vec<SkillView> {
    let report = UnlockReport::evaluate(catalog, &state.quests);
    let boost = unlock_rules::skill_boost(catalog.tuning(), &state.player);

    catalog
        .skills()
        .iter()
        .map(|skill| SkillView {
            id: skill.id.clone(),
            name: skill.name().to_owned(),
            available: skill.available,
            unlocked: report.is_skill_unlocked(&skill.id),
            completion_percent: (skill.base_percent + boost).clamp(0.0, 100.0),
        })
        .collect()
}
