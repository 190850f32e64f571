//! JSON import and export of the whole store, or of a single board.

mod migrate;

pub use migrate::{migrate, SCHEMA_VERSION};

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{new_id, Board, Note, TrashItem};
use crate::error::{NoteboardError, Result};
use crate::state::AppState;

/// Full backup of boards, notes and trash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    pub boards: Vec<Board>,
    pub notes: Vec<Note>,
    pub trash: Vec<TrashItem>,
}

impl ExportDocument {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            version: SCHEMA_VERSION,
            boards: state.boards.clone(),
            notes: state.notes.clone(),
            trash: state.trash.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Backup of one board and its live notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardExport {
    pub version: u32,
    pub board: Board,
    pub notes: Vec<Note>,
}

impl BoardExport {
    pub fn from_state(state: &AppState, board_id: &str) -> Result<Self> {
        let board = state
            .boards
            .iter()
            .find(|b| b.id == board_id)
            .ok_or_else(|| NoteboardError::BoardNotFound(board_id.to_string()))?;
        Ok(Self {
            version: SCHEMA_VERSION,
            board: board.clone(),
            notes: state.notes_for_board(board_id).into_iter().cloned().collect(),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Collections parsed from an import file, ready to replace the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedState {
    pub boards: Vec<Board>,
    pub notes: Vec<Note>,
    pub trash: Vec<TrashItem>,
}

/// A single board parsed from a board export, ready to merge.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedBoard {
    pub board: Board,
    pub notes: Vec<Note>,
}

#[derive(Deserialize)]
struct FullShape {
    boards: Vec<Board>,
    notes: Vec<Note>,
    #[serde(default)]
    trash: Vec<TrashItem>,
}

#[derive(Deserialize)]
struct BoardShape {
    board: Board,
    notes: Vec<Note>,
}

fn invalid(reason: impl Into<String>) -> NoteboardError {
    NoteboardError::InvalidFile(reason.into())
}

fn parse_object(text: &str) -> Result<serde_json::Map<String, Value>> {
    match serde_json::from_str(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(invalid("expected a JSON object")),
        Err(e) => Err(invalid(e.to_string())),
    }
}

fn document_version(map: &serde_json::Map<String, Value>) -> Result<u32> {
    match map.get("version") {
        None => Ok(0),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid("version must be a non-negative integer")),
    }
}

fn parse_board_shape(map: serde_json::Map<String, Value>) -> Result<BoardShape> {
    serde_json::from_value(Value::Object(map)).map_err(|e| invalid(e.to_string()))
}

/// Board ids must be unique, and so must note ids across live notes and trash.
fn check_unique_ids(full: &FullShape) -> Result<()> {
    let mut seen = HashSet::new();
    if let Some(dup) = full.boards.iter().find(|b| !seen.insert(b.id.as_str())) {
        return Err(invalid(format!("duplicate board id '{}'", dup.id)));
    }

    // Live notes and trash items share one id space
    let mut seen = HashSet::new();
    let mut note_ids = full
        .notes
        .iter()
        .map(|n| n.id.as_str())
        .chain(full.trash.iter().map(|t| t.id()));
    if let Some(dup) = note_ids.find(|id| !seen.insert(*id)) {
        return Err(invalid(format!("duplicate note id '{}'", dup)));
    }
    Ok(())
}

/// Parse a full backup.
///
/// Accepts the export layout `{boards, notes, trash?}` (versioned or not) and
/// the legacy single-board layout `{board, notes}`. A legacy board always gets
/// a fresh id and its notes are reassigned to it; the original id is dropped.
pub fn parse_import(text: &str) -> Result<ImportedState> {
    let map = parse_object(text)?;
    let version = document_version(&map)?;
    if version > SCHEMA_VERSION {
        return Err(invalid(format!("unsupported schema version {}", version)));
    }

    if map.contains_key("board") && !map.contains_key("boards") {
        let legacy = parse_board_shape(map)?;
        let board = Board {
            id: new_id(),
            ..legacy.board
        };
        let notes = legacy
            .notes
            .into_iter()
            .map(|n| Note {
                board_id: board.id.clone(),
                ..n
            })
            .collect();
        return Ok(ImportedState {
            boards: vec![board],
            notes,
            trash: Vec::new(),
        });
    }

    let doc = migrate(Value::Object(map), version).map_err(|e| invalid(e.to_string()))?;
    let full: FullShape = serde_json::from_value(doc).map_err(|e| invalid(e.to_string()))?;

    check_unique_ids(&full)?;

    Ok(ImportedState {
        boards: full.boards,
        notes: full.notes,
        trash: full.trash,
    })
}

/// Parse a single-board export for merging next to the existing boards.
pub fn parse_board_import(text: &str) -> Result<ImportedBoard> {
    let map = parse_object(text)?;
    let version = document_version(&map)?;
    if version > SCHEMA_VERSION {
        return Err(invalid(format!("unsupported schema version {}", version)));
    }
    if !map.contains_key("board") {
        return Err(invalid("expected a board export with 'board' and 'notes'"));
    }
    let shape = parse_board_shape(map)?;
    Ok(ImportedBoard {
        board: shape.board,
        notes: shape.notes,
    })
}

/// Default file name for a full backup taken on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("manager-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Default file name for a single-board backup. Characters that are not
/// allowed in file names are replaced with `_`.
pub fn board_export_filename(board_name: &str, date: NaiveDate) -> String {
    let safe: String = board_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let safe = if safe.is_empty() { "board".to_string() } else { safe };
    format!("{}-manager-backup-{}.json", safe, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        let work = state.create_board("Work stuff").unwrap().id.clone();
        state.create_note("buy milk", &work).unwrap();
        let id = state.create_note("call bob", "1").unwrap().id.clone();
        state.soft_delete_note(&id);
        state
    }

    #[test]
    fn test_export_then_import_reproduces_state() {
        let state = sample_state();
        let json = ExportDocument::from_state(&state).to_json_pretty().unwrap();
        let imported = parse_import(&json).unwrap();

        assert_eq!(imported.boards, state.boards);
        assert_eq!(imported.notes, state.notes);
        assert_eq!(imported.trash, state.trash);
    }

    #[test]
    fn test_export_is_pretty_and_versioned() {
        let json = ExportDocument::from_state(&AppState::default())
            .to_json_pretty()
            .unwrap();
        assert!(json.contains("\n  \"version\": 1"));
        assert!(json.contains("\"boards\""));
        assert!(json.contains("\"trash\": []"));
    }

    #[test]
    fn test_unversioned_export_imports() {
        let text = r#"{
            "boards": [{"id": "1", "name": "General", "order": 0}],
            "notes": [{"id": "n", "boardId": "1", "content": "hi", "timestamp": 10}],
            "trash": [{"id": "t", "boardId": "1", "content": "old", "timestamp": 5,
                       "deletedAt": 20, "originalBoardName": "General"}]
        }"#;
        let imported = parse_import(text).unwrap();
        assert_eq!(imported.notes[0].content, "hi");
        assert_eq!(imported.trash[0].deleted_at, 20);
    }

    #[test]
    fn test_missing_trash_defaults_to_empty() {
        let text = r#"{"boards": [], "notes": []}"#;
        assert!(parse_import(text).unwrap().trash.is_empty());
    }

    #[test]
    fn test_legacy_import_gets_fresh_board_id() {
        let text = r#"{
            "board": {"id": "1", "name": "Old", "order": 0},
            "notes": [{"id": "n1", "boardId": "1", "content": "x", "timestamp": 1}]
        }"#;
        let imported = parse_import(text).unwrap();

        assert_eq!(imported.boards.len(), 1);
        assert_eq!(imported.boards[0].name, "Old");
        assert_ne!(imported.boards[0].id, "1");
        assert_eq!(imported.notes[0].board_id, imported.boards[0].id);
        assert_eq!(imported.notes[0].id, "n1");
    }

    #[test]
    fn test_invalid_files_are_rejected() {
        for text in [
            "not json",
            "[1, 2]",
            r#"{"notes": []}"#,
            r#"{"boards": "nope", "notes": []}"#,
            r#"{"board": {"id": "1"}, "notes": []}"#,
            r#"{"version": "one", "boards": [], "notes": []}"#,
        ] {
            assert!(
                matches!(parse_import(text), Err(NoteboardError::InvalidFile(_))),
                "accepted {}",
                text
            );
        }
    }

    #[test]
    fn test_newer_version_is_invalid() {
        let text = r#"{"version": 99, "boards": [], "notes": []}"#;
        let err = parse_import(text).unwrap_err();
        assert!(err.to_string().starts_with("invalid file"));

        let legacy = r#"{"version": 99, "board": {"id": "1", "name": "Old"}, "notes": []}"#;
        assert!(matches!(
            parse_import(legacy),
            Err(NoteboardError::InvalidFile(_))
        ));
    }

    #[test]
    fn test_duplicate_note_ids_are_invalid() {
        let repeated_note = r#"{
            "boards": [{"id": "1", "name": "General"}],
            "notes": [
                {"id": "n", "boardId": "1", "content": "a", "timestamp": 1},
                {"id": "n", "boardId": "1", "content": "b", "timestamp": 2}
            ]
        }"#;
        assert!(matches!(
            parse_import(repeated_note),
            Err(NoteboardError::InvalidFile(_))
        ));

        let trash_shares_note_id = r#"{
            "boards": [{"id": "1", "name": "General"}],
            "notes": [{"id": "n", "boardId": "1", "content": "a", "timestamp": 1}],
            "trash": [{"id": "n", "boardId": "1", "content": "b", "timestamp": 2,
                       "deletedAt": 3, "originalBoardName": "General"}]
        }"#;
        let err = parse_import(trash_shares_note_id).unwrap_err();
        assert!(err.to_string().contains("duplicate note id 'n'"));
    }

    #[test]
    fn test_duplicate_board_ids_are_invalid() {
        let text = r#"{"boards": [{"id": "1", "name": "A"}, {"id": "1", "name": "B"}], "notes": []}"#;
        assert!(parse_import(text).is_err());
    }

    #[test]
    fn test_board_export_round_trip() {
        let state = sample_state();
        let board_id = state.find_board("Work stuff").unwrap().id.clone();
        let json = BoardExport::from_state(&state, &board_id)
            .unwrap()
            .to_json_pretty()
            .unwrap();

        let imported = parse_board_import(&json).unwrap();
        assert_eq!(imported.board.name, "Work stuff");
        assert_eq!(imported.notes.len(), 1);
        assert_eq!(imported.notes[0].content, "buy milk");
    }

    #[test]
    fn test_board_import_needs_board_shape() {
        assert!(parse_board_import(r#"{"boards": [], "notes": []}"#).is_err());
    }

    #[test]
    fn test_filenames() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(export_filename(date), "manager-backup-2026-03-09.json");
        assert_eq!(
            board_export_filename("a/b: c", date),
            "a_b_ c-manager-backup-2026-03-09.json"
        );
    }
}
