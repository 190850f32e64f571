//! In-memory application state and every mutation applied to it.
//!
//! `AppState` is the only owner of boards, notes, trash and the UI selections
//! (active board, sort order). Each mutation keeps the live-note invariant:
//! every live note's `board_id` names an existing board.

mod lookup;
mod sort;
mod view;

pub use sort::SortOrder;
pub use view::{sort_notes, visible_notes};

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::entity::{
    default_boards, new_id, now_millis, Board, Note, TrashItem, UNKNOWN_BOARD_NAME,
};
use crate::error::{NoteboardError, Result};
use crate::transfer::{ImportedBoard, ImportedState};

/// Direction for moving a board in the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the list
    Up,
    /// Towards the end of the list
    Down,
}

/// Result of deleting a board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardDeletion {
    pub board: Board,
    /// Number of notes moved to trash
    pub trashed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub boards: Vec<Board>,
    pub notes: Vec<Note>,
    pub trash: Vec<TrashItem>,
    pub active_board_id: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(default_boards(), Vec::new(), Vec::new())
    }
}

impl AppState {
    /// Build a state from stored collections. The first board becomes active.
    pub fn new(boards: Vec<Board>, notes: Vec<Note>, trash: Vec<TrashItem>) -> Self {
        let active_board_id = boards.first().map(|b| b.id.clone());
        Self {
            boards,
            notes,
            trash,
            active_board_id,
            sort_order: SortOrder::default(),
        }
    }

    fn board_exists(&self, id: &str) -> bool {
        self.boards.iter().any(|b| b.id == id)
    }

    fn board_name(&self, id: &str) -> String {
        self.boards
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| UNKNOWN_BOARD_NAME.to_string())
    }

    // ========== Notes ==========

    /// Prepend a new note to `board_id`. Content is stored untrimmed.
    pub fn create_note(&mut self, content: &str, board_id: &str) -> Result<&Note> {
        if content.trim().is_empty() {
            return Err(NoteboardError::EmptyContent);
        }
        if !self.board_exists(board_id) {
            return Err(NoteboardError::BoardNotFound(board_id.to_string()));
        }

        let note = Note::new(board_id.to_string(), content.to_string());
        debug!(note_id = %note.id, board_id, "created note");
        self.notes.insert(0, note);
        Ok(&self.notes[0])
    }

    /// Replace the content of note `id`. Returns false when no such note exists.
    pub fn update_note_content(&mut self, id: &str, content: &str) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.content = content.to_string();
                debug!(note_id = id, "updated note content");
                true
            }
            None => false,
        }
    }

    /// Reassign note `id` to `target_board_id`. Moving onto the board the note
    /// is already on is allowed.
    pub fn move_note(&mut self, id: &str, target_board_id: &str) -> Result<bool> {
        if !self.board_exists(target_board_id) {
            return Err(NoteboardError::BoardNotFound(target_board_id.to_string()));
        }
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.board_id = target_board_id.to_string();
                debug!(note_id = id, target_board_id, "moved note");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Move note `id` into trash, stamped with its board's current name.
    pub fn soft_delete_note(&mut self, id: &str) -> Option<TrashItem> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        let note = self.notes.remove(index);
        let board_name = self.board_name(&note.board_id);
        let item = TrashItem::new(note, board_name, now_millis());
        debug!(note_id = id, "moved note to trash");
        self.trash.push(item.clone());
        Some(item)
    }

    /// Take trash item `trash_id` out of the bin and put it back as a live note
    /// on `destination_board_id`, keeping its id, content and timestamp.
    pub fn restore_from_trash(
        &mut self,
        trash_id: &str,
        destination_board_id: &str,
    ) -> Result<Note> {
        let index = self
            .trash
            .iter()
            .position(|t| t.id() == trash_id)
            .ok_or_else(|| NoteboardError::TrashItemNotFound(trash_id.to_string()))?;
        if !self.board_exists(destination_board_id) {
            return Err(NoteboardError::BoardNotFound(
                destination_board_id.to_string(),
            ));
        }

        let item = self.trash.remove(index);
        let note = Note {
            board_id: destination_board_id.to_string(),
            ..item.note
        };
        debug!(note_id = %note.id, destination_board_id, "restored note");
        self.notes.insert(0, note.clone());
        Ok(note)
    }

    /// Live notes of one board, in storage order.
    pub fn notes_for_board(&self, board_id: &str) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.board_id == board_id).collect()
    }

    /// Notes on the active board, filtered by `search` and sorted by the
    /// current sort order. Empty when no board is active.
    pub fn visible_notes(&self, search: &str) -> Vec<&Note> {
        match self.active_board_id.as_deref() {
            Some(board_id) => visible_notes(&self.notes, board_id, search, self.sort_order),
            None => Vec::new(),
        }
    }

    // ========== Boards ==========

    /// Append a board named `name` (trimmed) and make it active.
    pub fn create_board(&mut self, name: &str) -> Result<&Board> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NoteboardError::EmptyBoardName);
        }

        let board = Board::new(name.to_string(), self.boards.len() as f64);
        debug!(board_id = %board.id, name, "created board");
        self.active_board_id = Some(board.id.clone());
        self.boards.push(board);
        Ok(&self.boards[self.boards.len() - 1])
    }

    pub fn rename_board(&mut self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NoteboardError::EmptyBoardName);
        }
        let board = self
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| NoteboardError::BoardNotFound(id.to_string()))?;
        board.name = name.to_string();
        debug!(board_id = id, name, "renamed board");
        Ok(())
    }

    /// Remove board `id`, moving every one of its notes into trash first.
    pub fn delete_board(&mut self, id: &str) -> Option<BoardDeletion> {
        let index = self.boards.iter().position(|b| b.id == id)?;
        let deleted_at = now_millis();
        let board_name = self.boards[index].name.clone();

        let (trashed, kept): (Vec<Note>, Vec<Note>) = std::mem::take(&mut self.notes)
            .into_iter()
            .partition(|n| n.board_id == id);
        self.notes = kept;
        let count = trashed.len();
        self.trash.extend(
            trashed
                .into_iter()
                .map(|n| TrashItem::new(n, board_name.clone(), deleted_at)),
        );

        let board = self.boards.remove(index);
        if self.active_board_id.as_deref() == Some(id) {
            self.active_board_id = self.boards.first().map(|b| b.id.clone());
        }
        debug!(board_id = id, trashed = count, "deleted board");

        Some(BoardDeletion {
            board,
            trashed: count,
        })
    }

    /// Boards in display order.
    pub fn sorted_boards(&self) -> Vec<&Board> {
        let mut boards: Vec<&Board> = self.boards.iter().collect();
        boards.sort_by(|a, b| a.order.total_cmp(&b.order));
        boards
    }

    /// Swap `order` with the neighbouring board. Returns false at either end
    /// of the list or when the board does not exist.
    pub fn reorder_board(&mut self, id: &str, direction: Direction) -> bool {
        let mut sorted = std::mem::take(&mut self.boards);
        sorted.sort_by(|a, b| a.order.total_cmp(&b.order));
        self.boards = sorted;

        let Some(index) = self.boards.iter().position(|b| b.id == id) else {
            return false;
        };
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.boards.len() => index + 1,
            _ => return false,
        };

        let order = self.boards[index].order;
        self.boards[index].order = self.boards[target].order;
        self.boards[target].order = order;
        self.boards.swap(index, target);
        debug!(board_id = id, ?direction, "reordered board");
        true
    }

    pub fn set_active_board(&mut self, id: &str) -> Result<()> {
        if !self.board_exists(id) {
            return Err(NoteboardError::BoardNotFound(id.to_string()));
        }
        self.active_board_id = Some(id.to_string());
        Ok(())
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    /// Advance to the next sort order and return it.
    pub fn cycle_sort_order(&mut self) -> SortOrder {
        self.sort_order = self.sort_order.next();
        self.sort_order
    }

    // ========== Consistency ==========

    /// Point the active board at the first board when it names nothing valid.
    pub fn ensure_active_board(&mut self) {
        let valid = self
            .active_board_id
            .as_deref()
            .is_some_and(|id| self.board_exists(id));
        if !valid {
            self.active_board_id = self.boards.first().map(|b| b.id.clone());
        }
    }

    /// Move live notes whose board is missing into trash. Returns how many moved.
    pub fn repair_orphans(&mut self) -> usize {
        let board_ids: HashSet<&str> = self.boards.iter().map(|b| b.id.as_str()).collect();
        let (orphans, kept): (Vec<Note>, Vec<Note>) = std::mem::take(&mut self.notes)
            .into_iter()
            .partition(|n| !board_ids.contains(n.board_id.as_str()));
        self.notes = kept;

        let count = orphans.len();
        if count > 0 {
            warn!(count, "moved notes without a board to trash");
            let deleted_at = now_millis();
            self.trash.extend(
                orphans
                    .into_iter()
                    .map(|n| TrashItem::new(n, UNKNOWN_BOARD_NAME.to_string(), deleted_at)),
            );
        }
        count
    }

    // ========== Import ==========

    /// Replace everything with an imported state. Nothing is merged.
    pub fn replace_with(&mut self, imported: ImportedState) {
        let sort_order = self.sort_order;
        *self = AppState::new(imported.boards, imported.notes, imported.trash);
        self.sort_order = sort_order;
        self.repair_orphans();
    }

    /// Add a single exported board next to the existing ones and make it
    /// active. The board always gets a fresh id. Notes whose id is already
    /// taken get fresh ids too.
    pub fn merge_board(&mut self, imported: ImportedBoard) -> &Board {
        let board = Board {
            id: new_id(),
            name: imported.board.name,
            order: self.boards.len() as f64,
        };

        let mut taken: HashSet<String> = self
            .notes
            .iter()
            .map(|n| n.id.clone())
            .chain(self.trash.iter().map(|t| t.id().to_string()))
            .collect();
        for mut note in imported.notes {
            if !taken.insert(note.id.clone()) {
                note.id = new_id();
                taken.insert(note.id.clone());
            }
            note.board_id = board.id.clone();
            self.notes.push(note);
        }

        debug!(board_id = %board.id, "merged imported board");
        self.active_board_id = Some(board.id.clone());
        self.boards.push(board);
        &self.boards[self.boards.len() - 1]
    }
}
