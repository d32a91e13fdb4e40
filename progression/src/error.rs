use unlock_rules::{QuestBlocker, RuleError};

#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("unknown quest `{0}`")]
    UnknownQuest(String),
    #[error("unknown section `{0}`")]
    UnknownSection(String),
    #[error("quest `{quest_id}` cannot be completed: {blocker}")]
    Blocked {
        quest_id: String,
        blocker: QuestBlocker,
    },
    #[error("quest `{0}` does not take uploads")]
    UploadNotAccepted(String),
    #[error("quest `{0}` is already completed, uploads are closed")]
    UploadAfterCompletion(String),
    #[error("uploaded file name must not be blank")]
    BlankFileName,
    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl ProgressionError {
    /// The quest, skill or section the error is about, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            ProgressionError::UnknownQuest(id)
            | ProgressionError::UnknownSection(id)
            | ProgressionError::UploadNotAccepted(id)
            | ProgressionError::UploadAfterCompletion(id) => Some(id),
            ProgressionError::Blocked { quest_id, .. } => Some(quest_id),
            ProgressionError::BlankFileName => None,
            ProgressionError::Rule(RuleError::UnknownSkill(id))
            | ProgressionError::Rule(RuleError::UnknownQuest(id))
            | ProgressionError::Rule(RuleError::NotABoss(id)) => Some(id),
        }
    }
}
