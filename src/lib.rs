pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod state;
pub mod storage;
pub mod transfer;
pub mod translate;

pub use error::{NoteboardError, Result};
pub use state::AppState;
pub use storage::{KvStore, Persistence, SqliteKv};
