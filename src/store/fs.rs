//! Filesystem adapter for note files.
//!
//! The registry talks to storage only through the [`Storage`] trait, so tests
//! can substitute an implementation that fails on demand.

use crate::errors::NoteError;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::Builder;
use tracing::{debug, warn};

#[cfg(unix)]
use crate::constants::{DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS};
#[cfg(unix)]
use std::fs::Permissions;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Blob storage addressed by path.
///
/// Every failure is reported as `NoteError::Storage` carrying the offending path.
pub trait Storage {
    /// Reads the whole file.
    fn read(&self, path: &Path) -> Result<Vec<u8>, NoteError>;

    /// Replaces the file's content entirely, creating it if needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), NoteError>;

    /// Removes the file. A file that is already gone is not an error.
    fn remove(&self, path: &Path) -> Result<(), NoteError>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> Result<bool, NoteError>;

    /// Moves a file.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), NoteError>;

    /// Lists the file names directly inside `dir`.
    fn list(&self, dir: &Path) -> Result<Vec<String>, NoteError>;

    /// Creates `dir` and its parents if missing.
    fn ensure_dir(&self, dir: &Path) -> Result<(), NoteError>;
}

/// [`Storage`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn read(&self, path: &Path) -> Result<Vec<u8>, NoteError> {
        fs::read(path).map_err(|e| NoteError::storage(path, e))
    }

    /// Writes to a hidden temporary sibling and persists it over `path`, so a
    /// failed write never leaves a truncated note behind.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), NoteError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = Builder::new()
            .prefix(".sealnote-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| NoteError::storage(path, e))?;
        file.write_all(contents)
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| NoteError::storage(path, e))?;

        // NamedTempFile is already owner-only; keep it that way after persist.
        #[cfg(unix)]
        file.as_file()
            .set_permissions(Permissions::from_mode(DEFAULT_FILE_PERMISSIONS))
            .map_err(|e| NoteError::storage(path, e))?;

        file.persist(path)
            .map_err(|e| NoteError::storage(path, e.error))?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), NoteError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} was already removed", path.display());
                Ok(())
            }
            Err(e) => Err(NoteError::storage(path, e)),
        }
    }

    fn exists(&self, path: &Path) -> Result<bool, NoteError> {
        path.try_exists().map_err(|e| NoteError::storage(path, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), NoteError> {
        fs::rename(from, to).map_err(|e| NoteError::storage(from, e))
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>, NoteError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| NoteError::storage(dir, e))? {
            let entry = entry.map_err(|e| NoteError::storage(dir, e))?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping non UTF-8 file name {:?}", raw),
            }
        }
        Ok(names)
    }

    fn ensure_dir(&self, dir: &Path) -> Result<(), NoteError> {
        if dir.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(dir).map_err(|e| NoteError::storage(dir, e))?;

        // Set secure permissions (0o700 - read/write/execute only for owner)
        #[cfg(unix)]
        {
            fs::set_permissions(dir, Permissions::from_mode(DEFAULT_DIR_PERMISSIONS))
                .map_err(|e| NoteError::storage(dir, e))?;
            debug!("Set 0o700 permissions on notes directory");
        }
        Ok(())
    }
}
