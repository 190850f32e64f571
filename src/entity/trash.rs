// src/entity/trash.rs
use serde::{Deserialize, Serialize};

use super::Note;

/// Board name recorded when a note's board no longer exists at delete time.
pub const UNKNOWN_BOARD_NAME: &str = "Unknown";

/// A soft-deleted note. Keeps a snapshot of its board's name, since that
/// board may be renamed or deleted later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashItem {
    #[serde(flatten)]
    pub note: Note,
    /// Deletion time, epoch milliseconds.
    pub deleted_at: i64,
    pub original_board_name: String,
}

impl TrashItem {
    pub fn new(note: Note, original_board_name: String, deleted_at: i64) -> Self {
        Self {
            note,
            deleted_at,
            original_board_name,
        }
    }

    pub fn id(&self) -> &str {
        &self.note.id
    }
}
