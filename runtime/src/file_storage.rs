//! File-backed key/value storage.
//!
//! Each slot is one JSON file named after its key inside a root directory.
//! Writes go to a temporary sibling file that is then renamed over the slot,
//! so a crash mid-write leaves either the old value or the new one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use todo_engine_core::storage::{KeyValueStorage, StorageError};

/// Durable storage rooted at a directory on the local file system.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) the storage directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;

        tracing::debug!(root = %root.display(), "Opened file storage");
        Ok(Self { root })
    }

    /// The directory holding the slot files
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] for keys that are empty or would
    /// escape the root directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');

        if !valid {
            return Err(StorageError::Unavailable(format!("invalid slot key '{key}'")));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source: std::io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        let written = fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(value.as_bytes())?;
            file.sync_all()
        });

        if let Err(source) = written.and_then(|()| fs::rename(&tmp, &path)) {
            // The slot keeps its previous contents; only the temp file goes.
            match fs::remove_file(&tmp) {
                Err(e) if e.kind() != ErrorKind::NotFound => {
                    tracing::warn!(path = %tmp.display(), error = %e, "Failed to remove temp file");
                }
                _ => {}
            }
            return Err(io_err(source));
        }

        Ok(())
    }
}
