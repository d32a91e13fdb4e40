use {
    crate::{Committed, ProgressionStore},
    bevy::prelude::*,
    progression_events::*,
};

fn report_save_failure<T>(commands: &mut Commands, committed: &Committed<T>) {
    if let Some(err) = &committed.save_error {
        commands.trigger(SaveFailed {
            reason: err.to_string(),
        });
    }
}

fn reject(commands: &mut Commands, action: RejectedAction, target: &str, reason: String) {
    warn!(?action, %target, %reason, "Request rejected");
    commands.trigger(ActionRejected {
        action,
        target: target.to_owned(),
        reason,
    });
}

pub fn complete_quest(
    trigger: On<CompleteQuestRequest>,
    mut store: ResMut<ProgressionStore>,
    mut commands: Commands,
) {
    let quest_id = &trigger.event().quest_id;

    let committed = match store.complete_quest(quest_id) {
        Ok(committed) => committed,
        Err(err) => {
            reject(
                &mut commands,
                RejectedAction::CompleteQuest,
                quest_id,
                err.to_string(),
            );
            return;
        }
    };
    report_save_failure(&mut commands, &committed);

    let completion = &committed.outcome;
    let player = &store.state().player;
    commands.trigger(QuestCompleted {
        quest_id: completion.quest_id.clone(),
        xp_awarded: completion.xp_awarded,
        quests_completed: player.quests_completed,
    });

    for reached in &completion.levels_reached {
        info!(level = reached.level, "Level up");
        commands.trigger(LevelUp {
            new_level: reached.level,
            xp_to_next_level: reached.xp_to_next_level,
        });
    }

    for skill_id in &completion.newly_unlocked_skills {
        info!(%skill_id, "Skill unlocked");
        commands.trigger(SkillUnlocked {
            skill_id: skill_id.clone(),
            display_name: store
                .catalog()
                .skill(skill_id)
                .and_then(|skill| skill.display_name.clone()),
        });
    }

    for quest_id in &completion.newly_ready_bosses {
        info!(%quest_id, "Boss ready");
        commands.trigger(BossReady {
            quest_id: quest_id.clone(),
            display_name: store
                .catalog()
                .quest(quest_id)
                .and_then(|quest| quest.display_name.clone()),
        });
    }
}

pub fn record_upload(
    trigger: On<RecordUploadRequest>,
    mut store: ResMut<ProgressionStore>,
    mut commands: Commands,
) {
    let event = trigger.event();

    match store.record_upload(&event.quest_id, &event.file_name) {
        Ok(committed) => {
            report_save_failure(&mut commands, &committed);
            let receipt = committed.outcome;
            commands.trigger(UploadRecorded {
                quest_id: receipt.quest_id,
                file_name: receipt.file_name,
                replaced: receipt.replaced,
            });
        }
        Err(err) => reject(
            &mut commands,
            RejectedAction::RecordUpload,
            &event.quest_id,
            err.to_string(),
        ),
    }
}

pub fn complete_resource(
    _trigger: On<CompleteResourceRequest>,
    mut store: ResMut<ProgressionStore>,
    mut commands: Commands,
) {
    let committed = store.record_resource_completed();
    report_save_failure(&mut commands, &committed);
    commands.trigger(ResourceCompleted {
        resources_completed: committed.outcome,
    });
}

pub fn navigate(
    trigger: On<NavigateRequest>,
    mut store: ResMut<ProgressionStore>,
    mut commands: Commands,
) {
    let section_id = &trigger.event().section_id;

    match store.set_current_section(section_id) {
        Ok(committed) => {
            report_save_failure(&mut commands, &committed);
            commands.trigger(SectionChanged {
                section_id: section_id.clone(),
                progress_percent: committed.outcome,
            });
        }
        Err(err) => reject(
            &mut commands,
            RejectedAction::Navigate,
            section_id,
            err.to_string(),
        ),
    }
}

pub fn set_dark_mode(
    trigger: On<SetDarkModeRequest>,
    mut store: ResMut<ProgressionStore>,
    mut commands: Commands,
) {
    let enabled = trigger.event().enabled;
    let committed = store.set_dark_mode(enabled);
    report_save_failure(&mut commands, &committed);
    if committed.outcome {
        commands.trigger(DarkModeChanged { enabled });
    }
}
