use {
    crate::*,
    bevy::prelude::*,
    progression::ProgressionStore,
    progression_events::{CompleteQuestRequest, RecordUploadRequest},
    roadmap_assets::RoadmapCatalog,
};

fn setup_app() -> App {
    let catalog = RoadmapCatalog::builtin().expect("builtin catalog");
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(ProgressionStore::in_memory(catalog))
        .add_plugins(RoadmapCorePlugin);
    app.update();
    app
}

fn complete(app: &mut App, quest_id: &str) {
    app.world_mut().trigger(CompleteQuestRequest {
        quest_id: quest_id.to_string(),
    });
    app.update();
}

#[test]
fn test_outcomes_are_queued_in_order() {
    let mut app = setup_app();

    complete(&mut app, "revit-families-learn");
    app.world_mut().trigger(RecordUploadRequest {
        quest_id: "revit-families-practice".to_string(),
        file_name: "family.rfa".to_string(),
    });
    app.update();
    complete(&mut app, "revit-families-practice");

    let queue = app.world().resource::<NotificationQueue>();
    let kinds: Vec<_> = queue.pending().iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NotificationKind::Quest,
            NotificationKind::Info,
            NotificationKind::Quest,
            NotificationKind::Unlock,
            NotificationKind::Boss,
        ]
    );
    assert_eq!(queue.pending()[0].message, "revit-families-learn (+100 XP)");
    assert_eq!(queue.pending()[3].message, "Revit Families");
}

#[test]
fn test_rejections_become_warnings() {
    let mut app = setup_app();

    complete(&mut app, "january-boss");

    let mut queue = app.world_mut().resource_mut::<NotificationQueue>();
    let drained = queue.drain();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].kind, NotificationKind::Warning);
    assert!(drained[0].message.contains("revit-families"));
    assert!(queue.pending().is_empty());
}
