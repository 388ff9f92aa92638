//! Editing a note in an external editor.
//!
//! The note is decrypted into a scratch file, the editor runs, and the result
//! is saved back only if it changed. The scratch file is wiped on every exit
//! path, including errors.

use crate::crypto::ScratchFile;
use crate::editor::Editor;
use crate::errors::{AppError, AppResult};
use crate::store::{NoteRegistry, Storage};
use secrecy::SecretString;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The body changed and was saved.
    Saved,
    /// The editor exited without changes; nothing was written.
    Unchanged,
}

/// Decrypts `name`, lets `editor` modify it, and saves the result.
///
/// # Errors
///
/// - `AppError::Note` for registry failures (unknown note, wrong password, storage)
/// - `AppError::Editor` if the editor fails; the note is left unchanged
/// - `AppError::Io` if the scratch file cannot be written or read
pub fn edit_note<S: Storage>(
    registry: &mut NoteRegistry<S>,
    name: &str,
    password: &SecretString,
    editor: &dyn Editor,
    scratch_dir: &Path,
) -> AppResult<EditOutcome> {
    let original = registry.decrypt(name, password)?;

    let scratch = ScratchFile::create_in(scratch_dir, ".txt", original.as_bytes())?;
    debug!("Decrypted note into scratch file");

    editor.open_file(scratch.path())?;

    let edited = String::from_utf8(scratch.read()?).map_err(|_| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Edited note is not valid UTF-8",
        ))
    })?;

    if edited == original {
        info!("Note unchanged; nothing saved");
        return Ok(EditOutcome::Unchanged);
    }

    registry.save(name, &edited, password)?;
    info!("Saved edited note");
    Ok(EditOutcome::Saved)
}
