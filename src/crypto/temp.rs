//! Secure temporary file handling with tmpfs preference.
//!
//! Decrypted note bodies that must reach an external editor are written to
//! scratch files here, preferring RAM-based tmpfs filesystems when available to
//! minimize disk persistence of plaintext.

use crate::constants::TMPFS_PATHS;
use crate::errors::AppResult;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempPath};
use tracing::{debug, warn};

/// Get a secure temporary directory, preferring tmpfs when available.
///
/// On Linux/BSD systems, this function prefers RAM-based tmpfs filesystems
/// (`/dev/shm` or `/run/shm`). If tmpfs is not available, it falls back to
/// the system temp directory with a warning.
pub fn get_secure_temp_dir() -> PathBuf {
    for candidate in TMPFS_PATHS {
        let path = Path::new(candidate);
        if path.is_dir() {
            debug!("Using tmpfs for scratch files: {}", path.display());
            return path.to_path_buf();
        }
    }

    warn!("No tmpfs available; decrypted scratch files will use the system temp directory");
    std::env::temp_dir()
}

/// A decrypted scratch file that is overwritten and removed on drop.
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    /// Writes `content` to a new owner-only scratch file inside `dir`.
    ///
    /// The file keeps `suffix` so editors can pick a sensible mode.
    pub fn create_in(dir: &Path, suffix: &str, content: &[u8]) -> AppResult<Self> {
        let mut file = Builder::new()
            .prefix(".sealnote-")
            .suffix(suffix)
            .tempfile_in(dir)?;
        file.write_all(content)?;
        file.as_file().sync_all()?;

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    /// Path of the scratch file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current content back, typically after an editor has run.
    pub fn read(&self) -> AppResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        // TempPath's own drop removes whatever is left.
        if let Err(e) = secure_delete(&self.path) {
            warn!("Failed to wipe scratch file: {}", e);
        }
    }
}

/// Best-effort secure file deletion (overwrite + remove).
///
/// Overwrites the file with zeros before removing it. This is not
/// cryptographically secure (SSD wear leveling, filesystem journals),
/// but better than direct deletion.
pub fn secure_delete(path: &Path) -> AppResult<()> {
    if !path.exists() {
        return Ok(());
    }

    let len = fs::metadata(path)?.len();
    {
        let mut file = OpenOptions::new().write(true).open(path)?;
        let zeros = vec![0u8; 8192];
        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(zeros.len() as u64) as usize;
            file.write_all(&zeros[..chunk])?;
            remaining -= chunk as u64;
        }
        file.sync_all()?;
    }
    fs::remove_file(path)?;
    debug!("Securely deleted scratch file");
    Ok(())
}
