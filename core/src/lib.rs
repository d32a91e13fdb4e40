use {bevy::prelude::*, progression::ProgressionPlugin};

mod notifications;

#[cfg(test)]
mod tests;

pub use notifications::*;

/// Everything a headless roadmap app needs.
///
/// Insert a [`progression::ProgressionStore`] before adding the plugin to
/// choose the catalog and storage; otherwise an in-memory store is used.
pub struct RoadmapCorePlugin;

impl Plugin for RoadmapCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ProgressionPlugin, NotificationPlugin));
    }
}
