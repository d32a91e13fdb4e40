//! Roadmap progression store and its Bevy plugin.
//!
//! [`ProgressionStore`] owns the state and is the only place it changes.
//! [`ProgressionPlugin`] wires the request events from `progression_events`
//! to the store and answers with the outcome events.

mod error;
mod store;
mod systems;
pub mod transitions;
mod views;


pub use {
    error::ProgressionError,
    store::{Committed, ProgressionStore},
    transitions::{QuestCompletion, UploadReceipt},
    views::{PlayerSummary, QuestView, SkillView},
};

use {bevy::prelude::*, roadmap_assets::RoadmapCatalog};

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<ProgressionStore>() {
            match RoadmapCatalog::builtin() {
                Ok(catalog) => {
                    warn!("No progression store inserted, using an in-memory one with the built-in catalog");
                    app.insert_resource(ProgressionStore::in_memory(catalog));
                }
                Err(err) => error!(%err, "Built-in catalog is invalid, progression is disabled"),
            }
        }

        app.add_observer(systems::complete_quest)
            .add_observer(systems::record_upload)
            .add_observer(systems::complete_resource)
            .add_observer(systems::navigate)
            .add_observer(systems::set_dark_mode);
    }
}
