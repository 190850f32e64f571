// src/entity/board.rs
use serde::{Deserialize, Serialize};

use super::new_id;

/// A named container for notes. `order` only drives display sorting and
/// does not have to be contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: f64,
}

impl Board {
    pub fn new(name: String, order: f64) -> Self {
        Self {
            id: new_id(),
            name,
            order,
        }
    }
}

/// The board set a fresh (or unreadable) store starts with.
pub fn default_boards() -> Vec<Board> {
    [("1", "General"), ("2", "Personal"), ("3", "Work")]
        .into_iter()
        .enumerate()
        .map(|(order, (id, name))| Board {
            id: id.to_string(),
            name: name.to_string(),
            order: order as f64,
        })
        .collect()
}
