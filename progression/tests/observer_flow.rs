use {
    bevy::prelude::*,
    progression::*,
    progression_events::*,
    roadmap_assets::RoadmapCatalog,
    save_load::{DirectoryStorage, MemoryStorage, SaveLoad},
};

#[derive(Resource, Default)]
struct Outcomes {
    completed: Vec<(String, u64)>,
    levels: Vec<(u32, u64)>,
    unlocked: Vec<String>,
    bosses: Vec<String>,
    uploads: Vec<(String, String)>,
    resources: Vec<u32>,
    sections: Vec<(String, u8)>,
    dark_mode: Vec<bool>,
    rejected: Vec<(RejectedAction, String)>,
}

fn builtin() -> RoadmapCatalog {
    RoadmapCatalog::builtin().expect("builtin catalog")
}

fn app_with(store: ProgressionStore) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(store)
        .add_plugins(ProgressionPlugin)
        .init_resource::<Outcomes>();

    app.add_observer(|trigger: On<QuestCompleted>, mut outcomes: ResMut<Outcomes>| {
        let event = trigger.event();
        outcomes
            .completed
            .push((event.quest_id.clone(), event.xp_awarded));
    });
    app.add_observer(|trigger: On<LevelUp>, mut outcomes: ResMut<Outcomes>| {
        let event = trigger.event();
        outcomes.levels.push((event.new_level, event.xp_to_next_level));
    });
    app.add_observer(|trigger: On<SkillUnlocked>, mut outcomes: ResMut<Outcomes>| {
        outcomes.unlocked.push(trigger.event().skill_id.clone());
    });
    app.add_observer(|trigger: On<BossReady>, mut outcomes: ResMut<Outcomes>| {
        outcomes.bosses.push(trigger.event().quest_id.clone());
    });
    app.add_observer(|trigger: On<UploadRecorded>, mut outcomes: ResMut<Outcomes>| {
        let event = trigger.event();
        outcomes
            .uploads
            .push((event.quest_id.clone(), event.file_name.clone()));
    });
    app.add_observer(|trigger: On<ResourceCompleted>, mut outcomes: ResMut<Outcomes>| {
        outcomes.resources.push(trigger.event().resources_completed);
    });
    app.add_observer(|trigger: On<SectionChanged>, mut outcomes: ResMut<Outcomes>| {
        let event = trigger.event();
        outcomes
            .sections
            .push((event.section_id.clone(), event.progress_percent));
    });
    app.add_observer(|trigger: On<DarkModeChanged>, mut outcomes: ResMut<Outcomes>| {
        outcomes.dark_mode.push(trigger.event().enabled);
    });
    app.add_observer(|trigger: On<ActionRejected>, mut outcomes: ResMut<Outcomes>| {
        let event = trigger.event();
        outcomes.rejected.push((event.action, event.target.clone()));
    });

    app.update();
    app
}

fn complete(app: &mut App, quest_id: &str) {
    app.world_mut().trigger(CompleteQuestRequest {
        quest_id: quest_id.to_string(),
    });
    app.update();
}

fn upload(app: &mut App, quest_id: &str, file_name: &str) {
    app.world_mut().trigger(RecordUploadRequest {
        quest_id: quest_id.to_string(),
        file_name: file_name.to_string(),
    });
    app.update();
}

#[test]
fn test_family_quests_unlock_skill_and_boss() {
    let mut app = app_with(ProgressionStore::in_memory(builtin()));

    complete(&mut app, "revit-families-learn");
    upload(&mut app, "revit-families-practice", "family.rfa");
    complete(&mut app, "revit-families-practice");

    let outcomes = app.world().resource::<Outcomes>();
    assert_eq!(
        outcomes.completed,
        vec![
            ("revit-families-learn".to_string(), 100),
            ("revit-families-practice".to_string(), 200),
        ]
    );
    assert_eq!(
        outcomes.uploads,
        vec![("revit-families-practice".to_string(), "family.rfa".to_string())]
    );
    assert_eq!(outcomes.unlocked, vec!["revit-families".to_string()]);
    assert_eq!(outcomes.bosses, vec!["january-boss".to_string()]);
    assert!(outcomes.rejected.is_empty());

    let store = app.world().resource::<ProgressionStore>();
    assert_eq!(store.is_skill_unlocked("revit-families"), Ok(true));
    assert_eq!(store.is_boss_ready("january-boss"), Ok(true));
    assert_eq!(store.state().player.skills_unlocked, 2);
}

#[test]
fn test_blocked_requests_are_rejected() {
    let mut app = app_with(ProgressionStore::in_memory(builtin()));

    complete(&mut app, "revit-families-practice");
    complete(&mut app, "january-boss");
    complete(&mut app, "unknown-quest");
    upload(&mut app, "revit-families-learn", "notes.pdf");
    app.world_mut().trigger(NavigateRequest {
        section_id: "2031".to_string(),
    });
    app.update();

    let outcomes = app.world().resource::<Outcomes>();
    assert!(outcomes.completed.is_empty());
    assert_eq!(
        outcomes.rejected,
        vec![
            (RejectedAction::CompleteQuest, "revit-families-practice".to_string()),
            (RejectedAction::CompleteQuest, "january-boss".to_string()),
            (RejectedAction::CompleteQuest, "unknown-quest".to_string()),
            (RejectedAction::RecordUpload, "revit-families-learn".to_string()),
            (RejectedAction::Navigate, "2031".to_string()),
        ]
    );

    let store = app.world().resource::<ProgressionStore>();
    assert_eq!(store.state().player.xp, 0);
    assert_eq!(store.state().current_section, "starting-point");
}

#[test]
fn test_recompletion_is_rejected() {
    let mut app = app_with(ProgressionStore::in_memory(builtin()));

    complete(&mut app, "revit-families-learn");
    complete(&mut app, "revit-families-learn");

    let outcomes = app.world().resource::<Outcomes>();
    assert_eq!(outcomes.completed.len(), 1);
    assert_eq!(
        outcomes.rejected,
        vec![(RejectedAction::CompleteQuest, "revit-families-learn".to_string())]
    );
    assert_eq!(app.world().resource::<ProgressionStore>().state().player.xp, 100);
}

#[test]
fn test_level_up_event_per_level() {
    let catalog = RoadmapCatalog::from_ron_str(
        r#"(
            tuning: (rewards: (boss: 2600)),
            skills: [],
            quests: [(id: "huge-boss")],
        )"#,
    )
    .unwrap();
    let mut app = app_with(ProgressionStore::in_memory(catalog));

    complete(&mut app, "huge-boss");

    assert_eq!(
        app.world().resource::<Outcomes>().levels,
        vec![(2, 1500), (3, 2250)]
    );
    let player = &app.world().resource::<ProgressionStore>().state().player;
    assert_eq!(player.level, 3);
    assert_eq!(player.xp, 100);
    assert_eq!(player.xp_to_next_level, 2250);
}

#[test]
fn test_level_up_reports_the_threshold_held_after_loading() {
    let storage = MemoryStorage::with_items([(
        save_load::SNAPSHOT_KEY,
        r#"{"player":{"level":3,"xp":950}}"#,
    )]);
    let store = ProgressionStore::open(builtin(), SaveLoad::new(storage));
    assert_eq!(store.state().player.xp_to_next_level, 1000);
    let mut app = app_with(store);

    complete(&mut app, "revit-families-learn");

    let player = &app.world().resource::<ProgressionStore>().state().player;
    assert_eq!(player.level, 4);
    assert_eq!(player.xp, 50);
    assert_eq!(player.xp_to_next_level, 1500);
    assert_eq!(
        app.world().resource::<Outcomes>().levels,
        vec![(4, player.xp_to_next_level)]
    );
}

#[test]
fn test_counters_sections_and_preferences() {
    let mut app = app_with(ProgressionStore::in_memory(builtin()));

    app.world_mut().trigger(CompleteResourceRequest);
    app.world_mut().trigger(CompleteResourceRequest);
    app.world_mut().trigger(NavigateRequest {
        section_id: "2027".to_string(),
    });
    app.world_mut().trigger(SetDarkModeRequest { enabled: true });
    app.world_mut().trigger(SetDarkModeRequest { enabled: true });
    app.update();

    let outcomes = app.world().resource::<Outcomes>();
    assert_eq!(outcomes.resources, vec![1, 2]);
    assert_eq!(outcomes.sections, vec![("2027".to_string(), 55)]);
    assert_eq!(outcomes.dark_mode, vec![true], "unchanged preference is not reported");

    let summary = app.world().resource::<ProgressionStore>().player_summary();
    assert_eq!(summary.resources_completed, 2);
    assert_eq!(summary.current_section, "2027");
    assert_eq!(summary.section_progress_percent, 55);
    assert!(summary.dark_mode);
}

#[test]
fn test_progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let open = || {
        let storage = DirectoryStorage::open(dir.path()).unwrap();
        ProgressionStore::open(builtin(), SaveLoad::new(storage))
    };

    {
        let mut app = app_with(open());
        complete(&mut app, "revit-families-learn");
        upload(&mut app, "revit-families-practice", "family.rfa");
        app.world_mut().trigger(NavigateRequest {
            section_id: "quest-log".to_string(),
        });
        app.update();
    }

    let store = open();
    let state = store.state();
    assert!(state.quests.is_completed("revit-families-learn"));
    assert!(!state.quests.is_completed("revit-families-practice"));
    assert_eq!(state.uploads.file_for("revit-families-practice"), Some("family.rfa"));
    assert_eq!(state.player.xp, 100);
    assert_eq!(state.player.projects_uploaded, 1);
    assert_eq!(state.current_section, "quest-log");
}

#[test]
fn test_legacy_keys_import_once() {
    let storage = MemoryStorage::with_items([
        ("quest_revit-families-learn_completed", "true"),
        ("quest_revit-families-practice_completed", "true"),
        ("quest_january-boss_completed", "true"),
        ("skill_revit-families_completed", "true"),
        ("file_revit-families-practice_uploaded", "family.rfa"),
        ("theme", "dark"),
    ]);

    let mut store = ProgressionStore::open(builtin(), SaveLoad::new(storage));

    let player = &store.state().player;
    // 100 + 200 + 500 crosses nothing; 800 < 1000
    assert_eq!(player.level, 1);
    assert_eq!(player.xp, 800);
    assert_eq!(player.quests_completed, 3);
    assert_eq!(player.projects_uploaded, 1);
    assert_eq!(player.skills_unlocked, 2);
    assert!(store.state().preferences.dark_mode);

    let keys = store.save_load().storage().keys().unwrap();
    assert_eq!(keys, vec![save_load::SNAPSHOT_KEY.to_string()]);

    let imported = store.state().clone();
    assert_eq!(store.load(), &imported);
}

#[test]
fn test_plugin_falls_back_to_in_memory_store() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(ProgressionPlugin);
    app.update();

    complete(&mut app, "revit-families-learn");

    let store = app.world().resource::<ProgressionStore>();
    assert_eq!(store.state().player.xp, 100);
}
