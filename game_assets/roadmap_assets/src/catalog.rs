use {
    crate::*,
    bevy::prelude::*,
    std::{
        collections::{HashMap, HashSet},
        fs,
        path::{Path, PathBuf},
    },
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("duplicate quest id `{0}`")]
    DuplicateQuest(String),
    #[error("duplicate skill id `{0}`")]
    DuplicateSkill(String),
    #[error("duplicate section id `{0}`")]
    DuplicateSection(String),
    #[error("skill `{skill}` requires unknown {kind} `{target}`")]
    UnknownRequirement {
        skill: String,
        kind: &'static str,
        target: String,
    },
    #[error("boss quest `{quest}` requires unknown skill `{skill}`")]
    UnknownBossSkill { quest: String, skill: String },
    #[error("quest `{0}` lists required skills but is not a boss quest")]
    SkillsOnNonBoss(String),
    #[error("skill requirements form a cycle through `{0}`")]
    RequirementCycle(String),
    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),
}

/// Validated, indexed catalog of skills, quests and sections.
#[derive(Debug, Clone)]
pub struct RoadmapCatalog {
    definition: CatalogDefinition,
    quest_index: HashMap<String, usize>,
    skill_index: HashMap<String, usize>,
    section_index: HashMap<String, usize>,
}

impl RoadmapCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_ron_str(BUILTIN_CATALOG)
    }

    pub fn from_ron_str(source: &str) -> Result<Self, CatalogError> {
        let definition: CatalogDefinition = ron::from_str(source)?;
        Self::from_definition(definition)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CatalogError> {
        let source = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_ron_str(&source)?;
        info!(path = %path.display(), quests = catalog.quests().len(), skills = catalog.skills().len(), "Loaded roadmap catalog");
        Ok(catalog)
    }

    pub fn from_definition(definition: CatalogDefinition) -> Result<Self, CatalogError> {
        let tuning = &definition.tuning;
        if tuning.base_xp_to_next_level == 0 {
            return Err(CatalogError::InvalidTuning(
                "base_xp_to_next_level must be at least 1",
            ));
        }
        if tuning.xp_growth_percent < 100 {
            return Err(CatalogError::InvalidTuning(
                "xp_growth_percent below 100 would shrink thresholds",
            ));
        }

        let quest_index = index_ids(
            definition.quests.iter().map(|q| q.id.as_str()),
            CatalogError::DuplicateQuest,
        )?;
        let skill_index = index_ids(
            definition.skills.iter().map(|s| s.id.as_str()),
            CatalogError::DuplicateSkill,
        )?;
        let section_index = index_ids(
            definition.sections.iter().map(|s| s.id.as_str()),
            CatalogError::DuplicateSection,
        )?;

        for skill in &definition.skills {
            for requirement in &skill.requires {
                let (kind, target, known) = match requirement {
                    Requirement::Skill(id) => ("skill", id, skill_index.contains_key(id)),
                    Requirement::Quest(id) => ("quest", id, quest_index.contains_key(id)),
                };
                if !known {
                    return Err(CatalogError::UnknownRequirement {
                        skill: skill.id.clone(),
                        kind,
                        target: target.clone(),
                    });
                }
            }
        }

        for quest in &definition.quests {
            if quest.requires_skills.is_empty() {
                continue;
            }
            if !quest.is_boss() {
                return Err(CatalogError::SkillsOnNonBoss(quest.id.clone()));
            }
            if let Some(unknown) = quest
                .requires_skills
                .iter()
                .find(|skill| !skill_index.contains_key(*skill))
            {
                return Err(CatalogError::UnknownBossSkill {
                    quest: quest.id.clone(),
                    skill: unknown.clone(),
                });
            }
        }

        let catalog = Self {
            definition,
            quest_index,
            skill_index,
            section_index,
        };
        catalog.check_acyclic()?;

        debug!(
            quests = catalog.definition.quests.len(),
            skills = catalog.definition.skills.len(),
            sections = catalog.definition.sections.len(),
            "Catalog validated"
        );
        Ok(catalog)
    }

    pub fn tuning(&self) -> &ProgressionTuning {
        &self.definition.tuning
    }

    pub fn quest(&self, quest_id: &str) -> Option<&QuestDefinition> {
        self.quest_index
            .get(quest_id)
            .map(|&index| &self.definition.quests[index])
    }

    pub fn skill(&self, skill_id: &str) -> Option<&SkillDefinition> {
        self.skill_index
            .get(skill_id)
            .map(|&index| &self.definition.skills[index])
    }

    pub fn section(&self, section_id: &str) -> Option<&SectionDefinition> {
        self.section_index
            .get(section_id)
            .map(|&index| &self.definition.sections[index])
    }

    pub fn quests(&self) -> &[QuestDefinition] {
        &self.definition.quests
    }

    pub fn skills(&self) -> &[SkillDefinition] {
        &self.definition.skills
    }

    pub fn sections(&self) -> &[SectionDefinition] {
        &self.definition.sections
    }

    pub fn bosses(&self) -> impl Iterator<Item = &QuestDefinition> {
        self.definition.quests.iter().filter(|quest| quest.is_boss())
    }

    /// First listed section, or the conventional starting point when none are listed.
    pub fn default_section(&self) -> &str {
        self.definition
            .sections
            .first()
            .map(|section| section.id.as_str())
            .unwrap_or(progression_components::DEFAULT_SECTION)
    }

    /// Whether `section_id` may be tracked. Catalogs without sections accept any id.
    pub fn accepts_section(&self, section_id: &str) -> bool {
        self.definition.sections.is_empty() || self.section_index.contains_key(section_id)
    }

    fn check_acyclic(&self) -> Result<(), CatalogError> {
        let mut finished = HashSet::new();
        for skill in &self.definition.skills {
            let mut path = HashSet::new();
            self.visit(&skill.id, &mut path, &mut finished)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        skill_id: &'a str,
        path: &mut HashSet<&'a str>,
        finished: &mut HashSet<&'a str>,
    ) -> Result<(), CatalogError> {
        if finished.contains(skill_id) {
            return Ok(());
        }
        if !path.insert(skill_id) {
            return Err(CatalogError::RequirementCycle(skill_id.to_owned()));
        }

        if let Some(skill) = self.skill(skill_id) {
            for requirement in &skill.requires {
                if let Requirement::Skill(next) = requirement {
                    self.visit(next, path, finished)?;
                }
            }
        }

        path.remove(skill_id);
        finished.insert(skill_id);
        Ok(())
    }
}

fn index_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    duplicate: fn(String) -> CatalogError,
) -> Result<HashMap<String, usize>, CatalogError> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        if index.insert(id.to_owned(), position).is_some() {
            return Err(duplicate(id.to_owned()));
        }
    }
    Ok(index)
}
