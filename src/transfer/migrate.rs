//! Schema versions of stored and exported documents.
//!
//! A document is the JSON object `{boards, notes, trash}` (exports also carry a
//! `version` field). Version 0 is the unversioned layout written before
//! versioning existed. Each step upgrades a document by exactly one version.

use serde_json::{json, Value};
use tracing::debug;

use crate::error::{NoteboardError, Result};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Upgrade `doc` from `from_version` to [`SCHEMA_VERSION`].
pub fn migrate(mut doc: Value, from_version: u32) -> Result<Value> {
    if from_version > SCHEMA_VERSION {
        return Err(NoteboardError::UnsupportedVersion {
            found: from_version,
            supported: SCHEMA_VERSION,
        });
    }

    let mut version = from_version;
    while version < SCHEMA_VERSION {
        doc = match version {
            0 => v0_to_v1(doc),
            _ => {
                return Err(NoteboardError::UnsupportedVersion {
                    found: from_version,
                    supported: SCHEMA_VERSION,
                })
            }
        };
        version += 1;
        debug!(version, "migrated document");
    }
    Ok(doc)
}

/// v1 keeps the v0 collections as they are and adds the version stamp.
fn v0_to_v1(mut doc: Value) -> Value {
    if let Value::Object(ref mut map) = doc {
        map.insert("version".to_string(), json!(1));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v0_document_is_stamped() {
        let doc = json!({"boards": [], "notes": []});
        let migrated = migrate(doc, 0).unwrap();
        assert_eq!(migrated["version"], 1);
        assert!(migrated["boards"].is_array());
    }

    #[test]
    fn test_current_version_is_untouched() {
        let doc = json!({"version": 1, "boards": [{"id": "a", "name": "A", "order": 0}]});
        assert_eq!(migrate(doc.clone(), SCHEMA_VERSION).unwrap(), doc);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let err = migrate(json!({}), SCHEMA_VERSION + 1).unwrap_err();
        assert!(matches!(err, NoteboardError::UnsupportedVersion { found: 2, .. }));
    }
}
