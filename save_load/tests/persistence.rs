use {
    progression_components::{DEFAULT_XP_TO_NEXT_LEVEL, RoadmapState},
    save_load::*,
};

fn sample_state() -> RoadmapState {
    let mut state = RoadmapState::new(["revit-families-learn", "revit-families-practice"], "quest-log");
    state.quests.mark_completed("revit-families-learn");
    state.uploads.record("revit-families-practice", "family.rfa");
    state.player.xp = 100;
    state.player.quests_completed = 1;
    state.player.projects_uploaded = 1;
    state.preferences.dark_mode = true;
    state
}

#[test]
fn test_nothing_saved_loads_fresh() {
    let save_load = SaveLoad::in_memory();
    assert!(matches!(save_load.load(), LoadedProgress::Fresh));
}

#[test]
fn test_snapshot_round_trip() {
    let mut save_load = SaveLoad::in_memory();
    let state = sample_state();

    save_load.save(&state).unwrap();

    let LoadedProgress::Snapshot(loaded) = save_load.load() else {
        panic!("expected a snapshot");
    };
    assert_eq!(loaded, state);
}

#[test]
fn test_snapshot_layout() {
    let mut save_load = SaveLoad::in_memory();
    save_load.save(&sample_state()).unwrap();

    let raw = save_load.storage().get_item(SNAPSHOT_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["version"], SNAPSHOT_VERSION);
    assert!(json["savedAt"].is_string());
    assert_eq!(json["currentSection"], "quest-log");
    assert_eq!(json["player"]["questsCompleted"], 1);
    assert_eq!(json["quests"]["revit-families-learn"], true);
    assert_eq!(json["uploads"]["revit-families-practice"], "family.rfa");
}

#[test]
fn test_invalid_json_loads_fresh() {
    let save_load = SaveLoad::new(MemoryStorage::with_items([(SNAPSHOT_KEY, "{not json")]));
    assert!(matches!(save_load.load(), LoadedProgress::Fresh));

    let save_load = SaveLoad::new(MemoryStorage::with_items([(SNAPSHOT_KEY, "[1, 2, 3]")]));
    assert!(matches!(save_load.load(), LoadedProgress::Fresh));

    let save_load = SaveLoad::new(MemoryStorage::with_items([(
        SNAPSHOT_KEY,
        r#"{"player": {"xp": -5}}"#,
    )]));
    assert!(matches!(save_load.load(), LoadedProgress::Fresh));
}

#[test]
fn test_partial_snapshot_merges_over_defaults() {
    let save_load = SaveLoad::new(MemoryStorage::with_items([(
        SNAPSHOT_KEY,
        r#"{"player": {"level": 2}, "quests": {"a-learn": true}}"#,
    )]));

    let LoadedProgress::Snapshot(state) = save_load.load() else {
        panic!("expected a snapshot");
    };
    assert_eq!(state.player.level, 2);
    assert_eq!(state.player.xp, 0);
    assert_eq!(state.player.xp_to_next_level, DEFAULT_XP_TO_NEXT_LEVEL);
    assert!(state.quests.is_completed("a-learn"));
    assert_eq!(state.current_section, "starting-point");
    assert!(!state.preferences.dark_mode);
}

#[test]
fn test_corrupt_snapshot_falls_back_to_legacy_keys() {
    let save_load = SaveLoad::new(MemoryStorage::with_items([
        (SNAPSHOT_KEY, "garbage"),
        ("quest_a-learn_completed", "true"),
    ]));

    let LoadedProgress::Legacy(records) = save_load.load() else {
        panic!("expected legacy records");
    };
    assert!(records.completed_quests.contains("a-learn"));
}

#[test]
fn test_legacy_keys_are_read() {
    let save_load = SaveLoad::new(MemoryStorage::with_items([
        ("quest_revit-families-learn_completed", "true"),
        ("quest_revit-families-practice_completed", "false"),
        ("skill_revit-families_completed", "true"),
        ("file_revit-families-practice_uploaded", "family.rfa"),
        ("darkMode", "false"),
        ("theme", "dark"),
        ("unrelated", "value"),
    ]));

    let LoadedProgress::Legacy(records) = save_load.load() else {
        panic!("expected legacy records");
    };

    assert_eq!(
        records.completed_quests.iter().collect::<Vec<_>>(),
        vec!["revit-families-learn"]
    );
    assert!(records.completed_skills.contains("revit-families"));
    assert_eq!(
        records.uploads.get("revit-families-practice").map(String::as_str),
        Some("family.rfa")
    );
    assert_eq!(records.dark_mode, Some(true), "theme wins over darkMode");
    assert_eq!(records.keys.len(), 6);
}

#[test]
fn test_clear_legacy_keeps_unrelated_keys() {
    let mut save_load = SaveLoad::new(MemoryStorage::with_items([
        ("quest_a-learn_completed", "true"),
        ("darkMode", "true"),
        ("unrelated", "value"),
    ]));
    let LoadedProgress::Legacy(records) = save_load.load() else {
        panic!("expected legacy records");
    };

    save_load.clear_legacy(&records).unwrap();

    assert_eq!(save_load.storage().keys().unwrap(), vec!["unrelated".to_string()]);
    assert!(matches!(save_load.load(), LoadedProgress::Fresh));
}

#[test]
fn test_snapshot_wins_over_legacy_keys() {
    let mut save_load = SaveLoad::new(MemoryStorage::with_items([("quest_a-learn_completed", "true")]));
    save_load.save(&RoadmapState::default()).unwrap();
    assert!(matches!(save_load.load(), LoadedProgress::Snapshot(_)));
}

#[test]
fn test_directory_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = DirectoryStorage::open(dir.path().join("data")).unwrap();

    assert_eq!(storage.get_item("roadmapState").unwrap(), None);
    storage.set_item("roadmapState", "{}").unwrap();
    storage.set_item("roadmapState", r#"{"player": {}}"#).unwrap();
    assert_eq!(
        storage.get_item("roadmapState").unwrap().as_deref(),
        Some(r#"{"player": {}}"#)
    );

    // temporary files are not listed
    assert_eq!(storage.keys().unwrap(), vec!["roadmapState".to_string()]);

    storage.remove_item("roadmapState").unwrap();
    storage.remove_item("roadmapState").unwrap();
    assert!(storage.keys().unwrap().is_empty());
}

#[test]
fn test_directory_storage_rejects_path_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = DirectoryStorage::open(dir.path()).unwrap();

    for key in ["../escape", "", ".hidden", "a/b"] {
        assert!(
            matches!(storage.set_item(key, "x"), Err(StorageError::InvalidKey(_))),
            "{key:?} should be rejected"
        );
    }
}

#[test]
fn test_directory_backed_save_load() {
    let dir = tempfile::tempdir().unwrap();
    let state = sample_state();

    {
        let mut save_load = SaveLoad::new(DirectoryStorage::open(dir.path()).unwrap());
        save_load.save(&state).unwrap();
    }

    let save_load = SaveLoad::new(DirectoryStorage::open(dir.path()).unwrap());
    let LoadedProgress::Snapshot(loaded) = save_load.load() else {
        panic!("expected a snapshot");
    };
    assert_eq!(loaded, state);
}

#[test]
fn test_legacy_scan_ignores_foreign_and_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("quest_a-learn_completed"), "true").unwrap();
    std::fs::write(dir.path().join("notes (copy).txt"), "shopping list").unwrap();
    std::fs::write(dir.path().join("quest_b-learn_completed"), [0xff, 0xfe, 0x00]).unwrap();
    std::fs::write(dir.path().join("quest_c learn_completed"), "true").unwrap();

    let save_load = SaveLoad::new(DirectoryStorage::open(dir.path()).unwrap());
    let LoadedProgress::Legacy(records) = save_load.load() else {
        panic!("expected legacy records");
    };

    assert!(records.completed_quests.contains("a-learn"));
    assert_eq!(records.completed_quests.len(), 1);
    assert_eq!(records.keys, vec!["quest_a-learn_completed".to_string()]);
}
