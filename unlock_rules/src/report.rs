use {
    crate::resolver::SkillResolver,
    progression_components::QuestState,
    roadmap_assets::RoadmapCatalog,
};

/// Unlocked skills and ready bosses for one quest state, in catalog order.
///
/// Comparing the report taken before a mutation with the one taken after it
/// yields what the mutation unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockReport {
    unlocked_skills: Vec<String>,
    ready_bosses: Vec<String>,
}

impl UnlockReport {
    pub fn evaluate(catalog: &RoadmapCatalog, quests: &QuestState) -> Self {
        let mut resolver = SkillResolver::new(catalog, quests);

        let unlocked_skills = catalog
            .skills()
            .iter()
            .filter(|skill| resolver.is_unlocked(&skill.id))
            .map(|skill| skill.id.clone())
            .collect();

        let ready_bosses = catalog
            .bosses()
            .filter(|boss| {
                boss.requires_skills
                    .iter()
                    .all(|skill_id| resolver.is_unlocked(skill_id))
            })
            .map(|boss| boss.id.clone())
            .collect();

        Self {
            unlocked_skills,
            ready_bosses,
        }
    }

    pub fn is_skill_unlocked(&self, skill_id: &str) -> bool {
        self.unlocked_skills.iter().any(|id| id == skill_id)
    }

    pub fn is_boss_ready(&self, boss_id: &str) -> bool {
        self.ready_bosses.iter().any(|id| id == boss_id)
    }

    pub fn unlocked_skills(&self) -> &[String] {
        &self.unlocked_skills
    }

    pub fn ready_bosses(&self) -> &[String] {
        &self.ready_bosses
    }

    pub fn unlocked_count(&self) -> u32 {
        self.unlocked_skills.len() as u32
    }

    /// Skills unlocked here that were locked in `previous`.
    pub fn newly_unlocked_skills(&self, previous: &UnlockReport) -> Vec<String> {
        self.unlocked_skills
            .iter()
            .filter(|id| !previous.is_skill_unlocked(id))
            .cloned()
            .collect()
    }

    /// Bosses ready here that were not ready in `previous`.
    pub fn newly_ready_bosses(&self, previous: &UnlockReport) -> Vec<String> {
        self.ready_bosses
            .iter()
            .filter(|id| !previous.is_boss_ready(id))
            .cloned()
            .collect()
    }
}
