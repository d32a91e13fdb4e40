use {
    progression_components::QuestState,
    roadmap_assets::{Requirement, RoadmapCatalog},
    std::collections::{HashMap, HashSet},
};

/// Memoizing evaluator for transitive skill requirements.
///
/// A skill that is reached again while its own requirements are still being
/// evaluated counts as locked, so a malformed cycle can never unlock anything.
pub(crate) struct SkillResolver<'a> {
    catalog: &'a RoadmapCatalog,
    quests: &'a QuestState,
    resolved: HashMap<&'a str, bool>,
    in_progress: HashSet<&'a str>,
}

impl<'a> SkillResolver<'a> {
    pub(crate) fn new(catalog: &'a RoadmapCatalog, quests: &'a QuestState) -> Self {
        Self {
            catalog,
            quests,
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Unknown skills are locked.
    pub(crate) fn is_unlocked(&mut self, skill_id: &str) -> bool {
        let catalog = self.catalog;
        let Some(skill) = catalog.skill(skill_id) else {
            return false;
        };
        let key = skill.id.as_str();

        if let Some(&unlocked) = self.resolved.get(key) {
            return unlocked;
        }
        if !self.in_progress.insert(key) {
            return false;
        }

        let unlocked = skill.available
            && skill.requires.iter().all(|requirement| match requirement {
                Requirement::Quest(quest_id) => self.quests.is_completed(quest_id),
                Requirement::Skill(required) => self.is_unlocked(required),
            });

        self.in_progress.remove(key);
        self.resolved.insert(key, unlocked);
        unlocked
    }
}
