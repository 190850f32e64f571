use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteboardError {
    #[error("Not in a noteboard project. Run 'noteboard init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .noteboard/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Note content is empty")]
    EmptyContent,

    #[error("Board name is empty")]
    EmptyBoardName,

    #[error("No active board. Create one with 'noteboard board add <NAME>'.")]
    NoActiveBoard,

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Trash item not found: {0}")]
    TrashItemNotFound(String),

    #[error("Ambiguous id '{0}' matches more than one entry")]
    AmbiguousId(String),

    #[error("Invalid sort order: {0}. Valid orders: newest, oldest, content")]
    InvalidSortOrder(String),

    #[error("Unknown language: {0}. Valid languages: Arabic, English, French, Spanish, German, auto")]
    InvalidLanguage(String),

    #[error("invalid file: {0}")]
    InvalidFile(String),

    #[error("Unsupported schema version {found} (this build understands up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("{0}")]
    Aborted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NoteboardError>;
