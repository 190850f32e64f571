//! Persistence of the application state in a key-value store.
//!
//! Boards, notes and trash are stored as three independent JSON arrays under
//! fixed keys, next to the UI selections and the schema version. Every save
//! rewrites all of them.

mod memory_kv;
mod sqlite_kv;

pub use memory_kv::MemoryKv;
pub use sqlite_kv::SqliteKv;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::entity::{default_boards, Board, Note, TrashItem};
use crate::error::{NoteboardError, Result};
use crate::state::{AppState, SortOrder};
use crate::transfer::{migrate, SCHEMA_VERSION};

pub const NOTEBOARD_DIR: &str = ".noteboard";

pub const BOARDS_KEY: &str = "app_boards";
pub const NOTES_KEY: &str = "app_notes";
pub const TRASH_KEY: &str = "app_trash";
pub const UI_KEY: &str = "app_ui";
pub const VERSION_KEY: &str = "app_schema_version";

/// String key-value storage, the shape of a browser's local storage.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// UI selections kept between runs
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UiPrefs {
    active_board_id: Option<String>,
    sort_order: SortOrder,
}

struct StoredCollections {
    boards: Vec<Board>,
    notes: Vec<Note>,
    trash: Vec<TrashItem>,
}

pub struct Persistence<K: KvStore> {
    kv: K,
}

impl<K: KvStore> Persistence<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Read the whole state.
    ///
    /// Each blob falls back on its own: missing or unreadable boards become
    /// the default boards, and missing or unreadable notes or trash become
    /// empty. Data stamped with a newer schema version is refused rather than
    /// replaced.
    pub fn load(&self) -> Result<AppState> {
        let version = self.stored_version()?;
        if version > SCHEMA_VERSION {
            return Err(NoteboardError::UnsupportedVersion {
                found: version,
                supported: SCHEMA_VERSION,
            });
        }

        let c = self.read_collections(version)?;
        let mut state = AppState::new(c.boards, c.notes, c.trash);

        if let Some(raw) = self.kv.get(UI_KEY)? {
            match serde_json::from_str::<UiPrefs>(&raw) {
                Ok(prefs) => {
                    if prefs.active_board_id.is_some() {
                        state.active_board_id = prefs.active_board_id;
                    }
                    state.sort_order = prefs.sort_order;
                }
                Err(e) => warn!(error = %e, "ignoring unreadable UI preferences"),
            }
        }

        state.ensure_active_board();
        state.repair_orphans();
        debug!(
            boards = state.boards.len(),
            notes = state.notes.len(),
            trash = state.trash.len(),
            "loaded state"
        );
        Ok(state)
    }

    /// Write every collection, the UI selections and the schema version.
    pub fn save(&mut self, state: &AppState) -> Result<()> {
        let prefs = UiPrefs {
            active_board_id: state.active_board_id.clone(),
            sort_order: state.sort_order,
        };
        let entries = [
            (BOARDS_KEY, serde_json::to_string(&state.boards)?),
            (NOTES_KEY, serde_json::to_string(&state.notes)?),
            (TRASH_KEY, serde_json::to_string(&state.trash)?),
            (UI_KEY, serde_json::to_string(&prefs)?),
            (VERSION_KEY, SCHEMA_VERSION.to_string()),
        ];
        self.kv.set_many(&entries)?;
        debug!("saved state");
        Ok(())
    }

    fn stored_version(&self) -> Result<u32> {
        Ok(match self.kv.get(VERSION_KEY)? {
            None => 0,
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!(value = %raw, "unreadable schema version, assuming 0");
                0
            }),
        })
    }

    /// Raw JSON of one blob. Missing or unparseable blobs read as `null`.
    fn read_blob(&self, key: &str) -> Result<Value> {
        Ok(match self.kv.get(key)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key, error = %e, "stored blob is unreadable, using its default");
                Value::Null
            }),
            None => Value::Null,
        })
    }

    fn read_collections(&self, version: u32) -> Result<StoredCollections> {
        let doc = json!({
            "boards": self.read_blob(BOARDS_KEY)?,
            "notes": self.read_blob(NOTES_KEY)?,
            "trash": self.read_blob(TRASH_KEY)?,
        });
        let doc = migrate(doc, version)?;
        Ok(StoredCollections {
            boards: decode_or(&doc["boards"], BOARDS_KEY, default_boards),
            notes: decode_or(&doc["notes"], NOTES_KEY, Vec::new),
            trash: decode_or(&doc["trash"], TRASH_KEY, Vec::new),
        })
    }
}

/// Decode one collection, or fall back when it is absent or has the wrong shape.
fn decode_or<T: DeserializeOwned>(value: &Value, key: &str, fallback: impl FnOnce() -> T) -> T {
    if value.is_null() {
        return fallback();
    }
    T::deserialize(value).unwrap_or_else(|e| {
        warn!(key, error = %e, "stored blob has the wrong shape, using its default");
        fallback()
    })
}

impl Persistence<SqliteKv> {
    /// Create `.noteboard/` under `root` and store the default state there.
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(NOTEBOARD_DIR);
        if dir.exists() {
            return Err(NoteboardError::AlreadyInitialized);
        }
        fs::create_dir_all(&dir)?;

        let mut persistence = Self::new(SqliteKv::open(&dir)?);
        persistence.save(&AppState::default())?;
        Ok(persistence)
    }

    /// Open the store of an existing project.
    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(NOTEBOARD_DIR);
        if !SqliteKv::exists_in(&dir) {
            return Err(NoteboardError::NotInitialized);
        }
        Ok(Self::new(SqliteKv::open(&dir)?))
    }

    /// The `.noteboard/` directory holding this store.
    pub fn dir(&self) -> Option<PathBuf> {
        self.kv
            .path()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
    }
}
