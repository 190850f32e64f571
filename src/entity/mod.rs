mod board;
mod note;
mod trash;

pub use board::{default_boards, Board};
pub use note::Note;
pub use trash::{TrashItem, UNKNOWN_BOARD_NAME};

use chrono::Utc;
use uuid::Uuid;

/// Generate a fresh entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as Unix epoch milliseconds, the unit every persisted timestamp uses.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// First eight characters of an id, for listings.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Render an epoch-millisecond timestamp as local `YYYY-MM-DD HH:MM`.
pub fn format_millis(millis: i64) -> String {
    match chrono::DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) => dt
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "-".to_string(),
    }
}
