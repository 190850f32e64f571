//! Resolve user-supplied identifiers to entries.
//!
//! Notes and trash items resolve by unique id prefix. Boards resolve by exact
//! id, then by case-insensitive name, then by unique id prefix.

use super::AppState;
use crate::entity::{Board, Note, TrashItem};
use crate::error::{NoteboardError, Result};

fn unique_prefix_match<'a, T>(
    items: &'a [T],
    ident: &str,
    id_of: impl Fn(&T) -> &str,
) -> Result<Option<&'a T>> {
    if let Some(exact) = items.iter().find(|item| id_of(item) == ident) {
        return Ok(Some(exact));
    }

    let mut matches = items.iter().filter(|item| id_of(item).starts_with(ident));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(Some(only)),
        (Some(_), Some(_)) => Err(NoteboardError::AmbiguousId(ident.to_string())),
        _ => Ok(None),
    }
}

impl AppState {
    pub fn find_note(&self, ident: &str) -> Result<&Note> {
        if ident.is_empty() {
            return Err(NoteboardError::NoteNotFound(ident.to_string()));
        }
        unique_prefix_match(&self.notes, ident, |n| n.id.as_str())?
            .ok_or_else(|| NoteboardError::NoteNotFound(ident.to_string()))
    }

    pub fn find_trash_item(&self, ident: &str) -> Result<&TrashItem> {
        if ident.is_empty() {
            return Err(NoteboardError::TrashItemNotFound(ident.to_string()));
        }
        unique_prefix_match(&self.trash, ident, |t| t.id())?
            .ok_or_else(|| NoteboardError::TrashItemNotFound(ident.to_string()))
    }

    pub fn find_board(&self, ident: &str) -> Result<&Board> {
        let not_found = || NoteboardError::BoardNotFound(ident.to_string());
        if ident.trim().is_empty() {
            return Err(not_found());
        }

        if let Some(board) = self.boards.iter().find(|b| b.id == ident) {
            return Ok(board);
        }

        let wanted = ident.trim().to_lowercase();
        let mut by_name = self.boards.iter().filter(|b| b.name.to_lowercase() == wanted);
        match (by_name.next(), by_name.next()) {
            (Some(only), None) => return Ok(only),
            (Some(_), Some(_)) => return Err(NoteboardError::AmbiguousId(ident.to_string())),
            _ => {}
        }

        unique_prefix_match(&self.boards, ident, |b| b.id.as_str())?.ok_or_else(not_found)
    }

    /// The active board, or `NoActiveBoard` when none is selected.
    pub fn active_board(&self) -> Result<&Board> {
        let id = self
            .active_board_id
            .as_deref()
            .ok_or(NoteboardError::NoActiveBoard)?;
        self.boards
            .iter()
            .find(|b| b.id == id)
            .ok_or(NoteboardError::NoActiveBoard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::default_boards;

    fn state_with_notes(ids: &[&str]) -> AppState {
        let notes = ids
            .iter()
            .map(|id| Note {
                id: id.to_string(),
                board_id: "1".to_string(),
                content: format!("note {}", id),
                timestamp: 1,
            })
            .collect();
        AppState::new(default_boards(), notes, Vec::new())
    }

    #[test]
    fn test_note_prefix_resolution() {
        let state = state_with_notes(&["abc123", "abd456"]);
        assert_eq!(state.find_note("abc").unwrap().id, "abc123");
        assert!(matches!(
            state.find_note("ab"),
            Err(NoteboardError::AmbiguousId(_))
        ));
        assert!(matches!(
            state.find_note("zzz"),
            Err(NoteboardError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_exact_id_wins_over_prefix() {
        let state = state_with_notes(&["ab", "abc"]);
        assert_eq!(state.find_note("ab").unwrap().id, "ab");
    }

    #[test]
    fn test_board_resolution_by_name() {
        let state = AppState::default();
        assert_eq!(state.find_board("work").unwrap().id, "3");
        assert_eq!(state.find_board("2").unwrap().name, "Personal");
        assert!(state.find_board("Nowhere").is_err());
    }

    #[test]
    fn test_active_board_missing() {
        let mut state = AppState::default();
        state.active_board_id = None;
        assert!(matches!(
            state.active_board(),
            Err(NoteboardError::NoActiveBoard)
        ));
    }
}
