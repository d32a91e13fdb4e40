mod cli;

use {
    bevy::{log::LogPlugin, prelude::*},
    clap::Parser,
    cli::{Cli, Command},
    progression::{PlayerSummary, ProgressionStore, QuestView, SkillView},
    progression_events::*,
    roadmap_assets::{CatalogError, RoadmapCatalog},
    roadmap_core::{NotificationQueue, RoadmapCorePlugin},
    save_load::{DirectoryStorage, SaveLoad},
    serde::Serialize,
    std::process::ExitCode,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    Rejected(String),
    #[error("failed to render output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections seen while handling the current command.
#[derive(Resource, Default)]
struct Rejections(Vec<String>);

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(LogPlugin {
        filter: "warn,\
            gamified_roadmap=info,\
            progression=info,\
            roadmap_core=info,\
            save_load=debug,\
            roadmap_assets=info"
            .into(),
        level: bevy::log::Level::INFO,
        ..Default::default()
    });

    match run(&cli, &mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, app: &mut App) -> Result<(), CliError> {
    let catalog = match &cli.catalog {
        Some(path) => RoadmapCatalog::load_from_path(path)?,
        None => RoadmapCatalog::builtin()?,
    };

    let data_dir = cli::data_dir(cli);
    let save_load = match DirectoryStorage::open(&data_dir) {
        Ok(storage) => SaveLoad::new(storage),
        Err(err) => {
            warn!(%err, dir = %data_dir.display(), "Data directory unavailable, progress will not be kept");
            SaveLoad::in_memory()
        }
    };

    app.insert_resource(ProgressionStore::open(catalog, save_load))
        .init_resource::<Rejections>()
        .add_plugins(RoadmapCorePlugin)
        .add_observer(|trigger: On<ActionRejected>, mut rejections: ResMut<Rejections>| {
            rejections.0.push(trigger.event().reason.clone());
        });
    app.update();

    dispatch(&cli.command, app);

    for notification in app
        .world_mut()
        .resource_mut::<NotificationQueue>()
        .drain()
    {
        if !cli.json {
            println!("[{}] {}", notification.title, notification.message);
        }
    }

    let rejections = std::mem::take(&mut app.world_mut().resource_mut::<Rejections>().0);
    if !rejections.is_empty() {
        return Err(CliError::Rejected(rejections.join("; ")));
    }

    print_view(cli, app.world().resource::<ProgressionStore>())
}

fn dispatch(command: &Command, app: &mut App) {
    let world = app.world_mut();
    match command {
        Command::Summary | Command::Quests | Command::Skills => return,
        Command::Complete { quest_id } => world.trigger(CompleteQuestRequest {
            quest_id: quest_id.clone(),
        }),
        Command::Upload {
            quest_id,
            file_name,
        } => world.trigger(RecordUploadRequest {
            quest_id: quest_id.clone(),
            file_name: file_name.clone(),
        }),
        Command::Resource => world.trigger(CompleteResourceRequest),
        Command::Section { section_id } => world.trigger(NavigateRequest {
            section_id: section_id.clone(),
        }),
        Command::DarkMode { state } => world.trigger(SetDarkModeRequest {
            enabled: state.enabled(),
        }),
    }
    app.update();
}

fn print_view(cli: &Cli, store: &ProgressionStore) -> Result<(), CliError> {
    match cli.command {
        Command::Quests => print_as(cli.json, store.quest_list().as_slice(), print_quests),
        Command::Skills => print_as(cli.json, store.skill_tree().as_slice(), print_skills),
        _ => print_as(cli.json, &store.player_summary(), print_summary),
    }
}

fn print_as<T: Serialize + ?Sized>(
    json: bool,
    view: &T,
    text: fn(&T),
) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        text(view);
    }
    Ok(())
}

fn print_summary(summary: &PlayerSummary) {
    println!(
        "Level {} ({}/{} XP)",
        summary.level, summary.xp, summary.xp_to_next_level
    );
    println!(
        "Quests {} | Resources {} | Uploads {} | Skills {}",
        summary.quests_completed,
        summary.resources_completed,
        summary.projects_uploaded,
        summary.skills_unlocked
    );
    println!(
        "Section {} ({}% along the roadmap)",
        summary.current_section, summary.section_progress_percent
    );
}

fn print_quests(quests: &[QuestView]) {
    for quest in quests {
        let status = if quest.completed {
            "done".to_string()
        } else if let Some(blocker) = &quest.blocker {
            format!("blocked: {blocker}")
        } else {
            "open".to_string()
        };
        let upload = quest
            .uploaded_file
            .as_deref()
            .map(|file| format!(" [{file}]"))
            .unwrap_or_default();
        println!("{:<32} {:<9} {status}{upload}", quest.id, format!("{:?}", quest.kind));
    }
}

fn print_skills(skills: &[SkillView]) {
    for skill in skills {
        let status = match (skill.available, skill.unlocked) {
            (_, true) => "unlocked",
            (false, false) => "not yet available",
            (true, false) => "locked",
        };
        println!(
            "{:<24} {:>5.1}% {status}",
            skill.name, skill.completion_percent
        );
    }
}
