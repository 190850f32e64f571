// src/entity/note.rs
use serde::{Deserialize, Serialize};

use super::{new_id, now_millis};

/// A free-text record living on exactly one board.
///
/// Field names follow the camelCase layout of earlier exports, so those files
/// load without conversion. Unknown fields (transient UI flags) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub board_id: String,
    pub content: String,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
}

impl Note {
    pub fn new(board_id: String, content: String) -> Self {
        Self {
            id: new_id(),
            board_id,
            content,
            timestamp: now_millis(),
        }
    }
}
