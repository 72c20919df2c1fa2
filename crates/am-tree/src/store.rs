//! On-disk entity layout.
//!
//! Entities land at `<root>/<entityType>/<entityId>.json`. Files are
//! written to a temporary sibling first and renamed into place, so an
//! interrupted run never leaves a truncated file behind.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::entity::Entity;
use crate::error::{ExportError, ExportResult};

/// Writes entities below an output directory.
#[derive(Debug, Clone)]
pub struct EntityStore {
    root: PathBuf,
}

impl EntityStore {
    /// Creates a store rooted at `root`. Nothing is created until the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an entity of the given type and id is written to.
    pub fn path_for(&self, type_dir: &str, entity_id: &str) -> PathBuf {
        self.root.join(type_dir).join(format!("{entity_id}.json"))
    }

    /// Writes `entity` under its own entity type directory.
    ///
    /// ## Errors
    ///
    /// See [`EntityStore::store`].
    pub fn store_entity(&self, entity: &Entity) -> ExportResult<PathBuf> {
        self.store(entity.entity_type(), entity)
    }

    /// Writes `entity` to `<root>/<type_dir>/<entityId>.json`, creating
    /// directories as needed and replacing any existing file.
    ///
    /// ## Errors
    ///
    /// Returns `ExportError::Schema` if the directory name or id is not a
    /// single path component, and `ExportError::Filesystem` if a directory
    /// or the file cannot be written.
    pub fn store(&self, type_dir: &str, entity: &Entity) -> ExportResult<PathBuf> {
        check_component(type_dir, entity)?;
        check_component(entity.entity_id(), entity)?;

        let dir = self.root.join(type_dir);
        fs::create_dir_all(&dir).map_err(|e| ExportError::filesystem(&dir, e))?;

        let path = self.path_for(type_dir, entity.entity_id());
        let json = serde_json::to_string_pretty(entity)?;

        let tmp = dir.join(format!(".{}.json.tmp", entity.entity_id()));
        fs::write(&tmp, json).map_err(|e| ExportError::filesystem(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| ExportError::filesystem(&path, e))?;

        debug!(path = %path.display(), "entity written");
        Ok(path)
    }
}

/// Rejects names that would escape their directory.
fn check_component(name: &str, entity: &Entity) -> ExportResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(ExportError::Schema {
            entity: entity.label(),
            message: format!("{name:?} cannot be used as a file or directory name"),
        });
    }
    Ok(())
}
