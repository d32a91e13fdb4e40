mod catalog;


pub use catalog::*;

use {
    growth::{CappedLinear, ThresholdGrowth},
    serde::{Deserialize, Serialize},
};

/// Catalog document bundled with the crate.
pub const BUILTIN_CATALOG: &str = include_str!("../assets/roadmap.ron");

/// Raw catalog document as written in a `roadmap.ron` file.
///
/// Nothing is checked at this stage; [`RoadmapCatalog::from_definition`] validates
/// and indexes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub tuning: ProgressionTuning,
    /// Navigable sections. The first one is where a new player starts.
    #[serde(default)]
    pub sections: Vec<SectionDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub quests: Vec<QuestDefinition>,
}

/// What kind of work a quest is. Decides the XP reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestKind {
    Learn,
    Practice,
    Boss,
    Other,
}

impl QuestKind {
    /// Infers the kind from the `<skill>-learn` / `-practice` / `-boss` naming convention.
    ///
    /// First match wins, in the order learn, practice, boss.
    pub fn from_id(quest_id: &str) -> Self {
        if quest_id.contains("learn") {
            QuestKind::Learn
        } else if quest_id.contains("practice") {
            QuestKind::Practice
        } else if quest_id.contains("boss") {
            QuestKind::Boss
        } else {
            QuestKind::Other
        }
    }
}

/// A one-way completable task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestDefinition {
    /// Unique key (e.g., "revit-families-learn").
    pub id: String,
    /// Optional metadata for UI display.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Explicit kind. Inferred from `id` when omitted.
    #[serde(default)]
    pub kind: Option<QuestKind>,
    /// Completion stays blocked until a file has been uploaded for this quest.
    #[serde(default)]
    pub requires_upload: bool,
    /// Skills that must be unlocked before a boss quest can be attempted.
    #[serde(default)]
    pub requires_skills: Vec<String>,
}

impl QuestDefinition {
    pub fn kind(&self) -> QuestKind {
        self.kind.unwrap_or_else(|| QuestKind::from_id(&self.id))
    }

    pub fn is_boss(&self) -> bool {
        self.kind() == QuestKind::Boss
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// A single prerequisite of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    /// Another skill that must be unlocked.
    Skill(String),
    /// A quest that must be completed.
    Quest(String),
}

/// A node of the skill tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Unique key (e.g., "revit-families").
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Completion percentage before any boost.
    #[serde(default)]
    pub base_percent: f32,
    /// Time-gated skills set this to `false`; they stay locked whatever the quests say.
    #[serde(default = "available_by_default")]
    pub available: bool,
    /// All of these must hold for the skill to unlock. Empty means "unlocked when available".
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

impl SkillDefinition {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

fn available_by_default() -> bool {
    true
}

/// A navigable roadmap section and how far along the roadmap it sits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub id: String,
    #[serde(default)]
    pub progress_percent: u8,
}

/// XP granted per quest kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpRewards {
    pub learn: u64,
    pub practice: u64,
    pub boss: u64,
    pub other: u64,
}

impl Default for XpRewards {
    fn default() -> Self {
        Self {
            learn: 100,
            practice: 200,
            boss: 500,
            other: 50,
        }
    }
}

/// Numeric knobs of the progression model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    /// Threshold of the first level-up.
    pub base_xp_to_next_level: u64,
    /// Threshold growth per level in percent (150 = ×1.5, floored).
    pub xp_growth_percent: u64,
    pub rewards: XpRewards,
    /// Skill percentage gained per completed quest.
    pub quest_boost: CappedLinear,
    /// Skill percentage gained per level above 1.
    pub level_boost: CappedLinear,
}

impl ProgressionTuning {
    pub fn xp_growth(&self) -> ThresholdGrowth {
        ThresholdGrowth::new(self.base_xp_to_next_level, self.xp_growth_percent)
    }
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            base_xp_to_next_level: 1000,
            xp_growth_percent: 150,
            rewards: XpRewards::default(),
            quest_boost: CappedLinear::new(2.0, 20.0),
            level_boost: CappedLinear::new(3.0, 30.0),
        }
    }
}
