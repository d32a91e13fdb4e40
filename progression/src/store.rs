use {
    crate::{
        ProgressionError,
        transitions::{self, QuestCompletion, UploadReceipt},
        views::{self, PlayerSummary, QuestView, SkillView},
    },
    bevy::prelude::*,
    progression_components::RoadmapState,
    roadmap_assets::RoadmapCatalog,
    save_load::{LoadedProgress, SaveError, SaveLoad},
    unlock_rules::RuleError,
};

/// Outcome of a mutation that was applied in memory.
///
/// `save_error` is set when the new state could not be written; the in-memory
/// state keeps the mutation either way.
#[derive(Debug)]
pub struct Committed<T> {
    pub outcome: T,
    pub save_error: Option<SaveError>,
}

impl<T> Committed<T> {
    pub fn is_persisted(&self) -> bool {
        self.save_error.is_none()
    }
}

/// Canonical roadmap progress and the only place it is mutated.
///
/// Every mutation validates first, applies a pure transition to the state and
/// then writes the whole state back through [`SaveLoad`].
#[derive(Resource, Debug)]
pub struct ProgressionStore {
    catalog: RoadmapCatalog,
    state: RoadmapState,
    save_load: SaveLoad,
}

impl ProgressionStore {
    /// Creates a store and loads whatever `save_load` holds.
    pub fn open(catalog: RoadmapCatalog, save_load: SaveLoad) -> Self {
        let state = transitions::fresh_state(&catalog);
        let mut store = Self {
            catalog,
            state,
            save_load,
        };
        store.load();
        store
    }

    pub fn in_memory(catalog: RoadmapCatalog) -> Self {
        Self::open(catalog, SaveLoad::in_memory())
    }

    /// Replaces the in-memory state with the persisted one.
    ///
    /// Never fails. Missing or unreadable data yields a fresh state, and
    /// per-key legacy data is imported once and then removed.
    pub fn load(&mut self) -> &RoadmapState {
        self.state = match self.save_load.load() {
            LoadedProgress::Snapshot(mut state) => {
                let report = transitions::normalize(&mut state, &self.catalog);
                if !report.is_clean() {
                    debug!(?report, "Normalized saved progress");
                }
                state
            }
            LoadedProgress::Legacy(records) => {
                let state = transitions::import_legacy(&self.catalog, &records);
                match self.save_load.save(&state) {
                    Ok(()) => {
                        if let Err(err) = self.save_load.clear_legacy(&records) {
                            warn!(%err, "Imported legacy progress but could not remove its keys");
                        }
                    }
                    Err(err) => {
                        error!(%err, "Failed to save imported progress, keeping the legacy keys");
                    }
                }
                state
            }
            LoadedProgress::Fresh => {
                debug!("No saved progress, starting fresh");
                transitions::fresh_state(&self.catalog)
            }
        };

        info!(
            level = self.state.player.level,
            xp = self.state.player.xp,
            quests_completed = self.state.player.quests_completed,
            section = %self.state.current_section,
            "Loaded progress"
        );
        &self.state
    }

    /// Writes the current state as one snapshot.
    pub fn save(&mut self) -> Result<(), SaveError> {
        self.save_load.save(&self.state)
    }

    pub fn complete_quest(
        &mut self,
        quest_id: &str,
    ) -> Result<Committed<QuestCompletion>, ProgressionError> {
        let completion = transitions::complete_quest(&mut self.state, &self.catalog, quest_id)?;
        info!(
            quest_id = %completion.quest_id,
            xp = completion.xp_awarded,
            level = self.state.player.level,
            "Quest completed"
        );
        Ok(self.commit(completion))
    }

    pub fn record_upload(
        &mut self,
        quest_id: &str,
        file_name: &str,
    ) -> Result<Committed<UploadReceipt>, ProgressionError> {
        let receipt =
            transitions::record_upload(&mut self.state, &self.catalog, quest_id, file_name)?;
        info!(quest_id = %receipt.quest_id, file = %receipt.file_name, "Upload recorded");
        Ok(self.commit(receipt))
    }

    /// Returns the new resource count.
    pub fn record_resource_completed(&mut self) -> Committed<u32> {
        let count = transitions::record_resource_completed(&mut self.state);
        debug!(resources_completed = count, "Resource completed");
        self.commit(count)
    }

    /// Returns the progress percentage of the new section.
    pub fn set_current_section(
        &mut self,
        section_id: &str,
    ) -> Result<Committed<u8>, ProgressionError> {
        let progress = transitions::set_current_section(&mut self.state, &self.catalog, section_id)?;
        debug!(section = %section_id, progress, "Section changed");
        Ok(self.commit(progress))
    }

    /// Returns whether the preference changed.
    pub fn set_dark_mode(&mut self, enabled: bool) -> Committed<bool> {
        let changed = transitions::set_dark_mode(&mut self.state, enabled);
        self.commit(changed)
    }

    pub fn state(&self) -> &RoadmapState {
        &self.state
    }

    pub fn catalog(&self) -> &RoadmapCatalog {
        &self.catalog
    }

    pub fn save_load(&self) -> &SaveLoad {
        &self.save_load
    }

    pub fn is_skill_unlocked(&self, skill_id: &str) -> Result<bool, RuleError> {
        unlock_rules::is_skill_unlocked(&self.catalog, skill_id, &self.state.quests)
    }

    pub fn is_boss_ready(&self, boss_id: &str) -> Result<bool, RuleError> {
        unlock_rules::is_boss_ready(&self.catalog, boss_id, &self.state.quests)
    }

    pub fn skill_completion_percent(&self, skill_id: &str) -> Result<f32, RuleError> {
        unlock_rules::skill_completion_percent(&self.catalog, skill_id, &self.state.player)
    }

    pub fn player_summary(&self) -> PlayerSummary {
        views::player_summary(&self.state, &self.catalog)
    }

    pub fn quest_list(&self) -> Vec<QuestView> {
        views::quest_list(&self.state, &self.catalog)
    }

    pub fn skill_tree(&self) -> Vec<SkillView> {
        views::skill_tree(&self.state, &self.catalog)
    }

    fn commit<T>(&mut self, outcome: T) -> Committed<T> {
        let save_error = self.save().err();
        if let Some(err) = &save_error {
            error!(%err, "Failed to save progress, keeping it in memory only");
        }
        Committed {
            outcome,
            save_error,
        }
    }
}
