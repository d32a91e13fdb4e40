use {
    clap::{Parser, Subcommand, ValueEnum},
    std::path::PathBuf,
};

#[derive(Parser, Debug)]
#[command(name = "gamified_roadmap")]
#[command(about = "Track skill-roadmap progress: quests, XP, levels and unlocks")]
pub struct Cli {
    /// Directory holding saved progress
    #[arg(long, env = "ROADMAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Catalog of skills, quests and sections (defaults to the built-in roadmap)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print views as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Level, XP and counters
    Summary,
    /// Every quest with its status and what blocks it
    Quests,
    /// Skill tree with unlock status and completion percentage
    Skills,
    /// Complete a quest
    Complete { quest_id: String },
    /// Record a simulated file upload for a quest
    Upload { quest_id: String, file_name: String },
    /// Count a completed learning resource
    Resource,
    /// Move to a roadmap section
    Section { section_id: String },
    /// Store the dark mode preference
    DarkMode { state: Toggle },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

/// `ROADMAP_DATA_DIR` or `--data-dir` if given, else the platform data directory.
pub fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gamified-roadmap")
    })
}
