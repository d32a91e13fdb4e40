//! Pure derivation of unlock status, boss readiness, quest blockers and rewards.
//!
//! Every function here is a function of the catalog and the passed-in state.
//! Nothing is cached between calls and nothing is mutated.

mod report;
mod resolver;


pub use report::*;

use {
    progression_components::{PlayerState, QuestState, UploadLog},
    resolver::SkillResolver,
    roadmap_assets::{ProgressionTuning, QuestDefinition, QuestKind, RoadmapCatalog, XpRewards},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("unknown skill `{0}`")]
    UnknownSkill(String),
    #[error("unknown quest `{0}`")]
    UnknownQuest(String),
    #[error("quest `{0}` is not a boss quest")]
    NotABoss(String),
}

/// Why a quest cannot be completed right now.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestBlocker {
    #[error("already completed")]
    AlreadyCompleted,
    #[error("an upload is required first")]
    UploadRequired,
    #[error("boss is not ready, missing skills: {}", missing_skills.join(", "))]
    BossNotReady { missing_skills: Vec<String> },
}

/// XP granted for completing a quest of `kind`.
pub fn xp_reward(kind: QuestKind, rewards: &XpRewards) -> u64 {
    match kind {
        QuestKind::Learn => rewards.learn,
        QuestKind::Practice => rewards.practice,
        QuestKind::Boss => rewards.boss,
        QuestKind::Other => rewards.other,
    }
}

pub fn is_skill_unlocked(
    catalog: &RoadmapCatalog,
    skill_id: &str,
    quests: &QuestState,
) -> Result<bool, RuleError> {
    if catalog.skill(skill_id).is_none() {
        return Err(RuleError::UnknownSkill(skill_id.to_owned()));
    }
    Ok(SkillResolver::new(catalog, quests).is_unlocked(skill_id))
}

pub fn is_boss_ready(
    catalog: &RoadmapCatalog,
    boss_id: &str,
    quests: &QuestState,
) -> Result<bool, RuleError> {
    Ok(missing_boss_skills(catalog, boss_id, quests)?.is_empty())
}

/// Skills of the boss's requirement set that are still locked, in catalog order.
pub fn missing_boss_skills(
    catalog: &RoadmapCatalog,
    boss_id: &str,
    quests: &QuestState,
) -> Result<Vec<String>, RuleError> {
    let boss = catalog
        .quest(boss_id)
        .ok_or_else(|| RuleError::UnknownQuest(boss_id.to_owned()))?;
    if !boss.is_boss() {
        return Err(RuleError::NotABoss(boss_id.to_owned()));
    }

    let mut resolver = SkillResolver::new(catalog, quests);
    Ok(boss
        .requires_skills
        .iter()
        .filter(|skill_id| !resolver.is_unlocked(skill_id))
        .cloned()
        .collect())
}

/// Boost shared by every skill: quest-count and level terms, each capped on its own.
pub fn skill_boost(tuning: &ProgressionTuning, player: &PlayerState) -> f32 {
    let quest_term = tuning.quest_boost.contribution(player.quests_completed);
    let level_term = tuning
        .level_boost
        .contribution(player.level.saturating_sub(1));
    quest_term + level_term
}

/// `base + boost`, clamped to `[0, 100]`.
pub fn skill_completion_percent(
    catalog: &RoadmapCatalog,
    skill_id: &str,
    player: &PlayerState,
) -> Result<f32, RuleError> {
    let skill = catalog
        .skill(skill_id)
        .ok_or_else(|| RuleError::UnknownSkill(skill_id.to_owned()))?;
    let boosted = skill.base_percent + skill_boost(catalog.tuning(), player);
    Ok(boosted.clamp(0.0, 100.0))
}

/// First reason, if any, that keeps `quest` from being completed.
///
/// Checked in order: already completed, missing upload, boss not ready.
pub fn quest_blocker(
    catalog: &RoadmapCatalog,
    quest: &QuestDefinition,
    quests: &QuestState,
    uploads: &UploadLog,
) -> Option<QuestBlocker> {
    if quests.is_completed(&quest.id) {
        return Some(QuestBlocker::AlreadyCompleted);
    }
    if quest.requires_upload && !uploads.has_upload(&quest.id) {
        return Some(QuestBlocker::UploadRequired);
    }
    if quest.is_boss() {
        let mut resolver = SkillResolver::new(catalog, quests);
        let missing_skills: Vec<String> = quest
            .requires_skills
            .iter()
            .filter(|skill_id| !resolver.is_unlocked(skill_id))
            .cloned()
            .collect();
        if !missing_skills.is_empty() {
            return Some(QuestBlocker::BossNotReady { missing_skills });
        }
    }
    None
}
