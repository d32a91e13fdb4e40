//! Headless notification feed.
//! Turns progression outcome events into short messages a presentation layer can drain.

use {
    bevy::prelude::*,
    progression_events::{
        ActionRejected, BossReady, LevelUp, QuestCompleted, SaveFailed, SkillUnlocked,
        UploadRecorded,
    },
    serde::Serialize,
};

pub struct NotificationPlugin;

impl Plugin for NotificationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NotificationQueue>()
            .add_observer(on_quest_completed)
            .add_observer(on_level_up)
            .add_observer(on_skill_unlocked)
            .add_observer(on_boss_ready)
            .add_observer(on_upload_recorded)
            .add_observer(on_action_rejected)
            .add_observer(on_save_failed);
    }
}

// ============================================================================
// Types
// ============================================================================

/// Kind of notification, used by presentation layers for styling.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    #[default]
    Info,
    Quest,
    LevelUp,
    Unlock,
    Boss,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NotificationData {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

/// Notifications waiting to be shown, oldest first.
#[derive(Resource, Default, Debug)]
pub struct NotificationQueue {
    pending: Vec<NotificationData>,
}

impl NotificationQueue {
    pub fn push(&mut self, data: NotificationData) {
        self.pending.push(data);
    }

    pub fn pending(&self) -> &[NotificationData] {
        &self.pending
    }

    /// Takes every pending notification.
    pub fn drain(&mut self) -> Vec<NotificationData> {
        std::mem::take(&mut self.pending)
    }
}

fn notify(queue: &mut NotificationQueue, kind: NotificationKind, title: &str, message: String) {
    queue.push(NotificationData {
        title: title.to_string(),
        message,
        kind,
    });
}

// ============================================================================
// Event Observers
// ============================================================================

fn on_quest_completed(trigger: On<QuestCompleted>, mut queue: ResMut<NotificationQueue>) {
    let event = trigger.event();
    notify(
        &mut queue,
        NotificationKind::Quest,
        "Quest Completed",
        format!("{} (+{} XP)", event.quest_id, event.xp_awarded),
    );
}

fn on_level_up(trigger: On<LevelUp>, mut queue: ResMut<NotificationQueue>) {
    notify(
        &mut queue,
        NotificationKind::LevelUp,
        "Level Up",
        format!("Reached level {}", trigger.event().new_level),
    );
}

fn on_skill_unlocked(trigger: On<SkillUnlocked>, mut queue: ResMut<NotificationQueue>) {
    let event = trigger.event();
    let message = event
        .display_name
        .clone()
        .unwrap_or_else(|| event.skill_id.clone());
    notify(&mut queue, NotificationKind::Unlock, "Skill Unlocked", message);
}

fn on_boss_ready(trigger: On<BossReady>, mut queue: ResMut<NotificationQueue>) {
    let event = trigger.event();
    let message = event
        .display_name
        .clone()
        .unwrap_or_else(|| event.quest_id.clone());
    notify(&mut queue, NotificationKind::Boss, "Boss Ready", message);
}

fn on_upload_recorded(trigger: On<UploadRecorded>, mut queue: ResMut<NotificationQueue>) {
    let event = trigger.event();
    notify(
        &mut queue,
        NotificationKind::Info,
        "Upload Recorded",
        format!("{} for {}", event.file_name, event.quest_id),
    );
}

fn on_action_rejected(trigger: On<ActionRejected>, mut queue: ResMut<NotificationQueue>) {
    notify(
        &mut queue,
        NotificationKind::Warning,
        "Not Possible",
        trigger.event().reason.clone(),
    );
}

fn on_save_failed(trigger: On<SaveFailed>, mut queue: ResMut<NotificationQueue>) {
    notify(
        &mut queue,
        NotificationKind::Warning,
        "Progress Not Saved",
        trigger.event().reason.clone(),
    );
}
