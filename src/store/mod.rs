//! The encrypted note registry.
//!
//! A [`NoteRegistry`] maps note names to `<name>.encryptednote` files in one
//! storage directory. The index is rebuilt from a directory listing when the
//! registry is opened and is never persisted on its own. Passwords are taken
//! per call and never kept.
//!
//! Every mutating operation performs its storage step first and touches the
//! in-memory index only once that step succeeded, so the index never points
//! at a file that was not written.

pub mod fs;

use crate::constants::{IMPORT_FALLBACK_NAME, NOTE_FILE_EXTENSION, NOTE_NAME_FORBIDDEN_CHARS};
use crate::crypto::{self, derive_key};
use crate::errors::NoteError;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use self::fs::{LocalStorage, Storage};

/// Shorthand for registry results.
pub type NoteResult<T> = Result<T, NoteError>;

/// In-memory index of the notes stored in one directory.
///
/// # Example
///
/// ```no_run
/// use sealnote::store::NoteRegistry;
/// use secrecy::SecretString;
///
/// let mut registry = NoteRegistry::open("/home/me/.sealnote/notes")?;
/// let password = SecretString::new("p1".to_string());
///
/// registry.create("diary", &password)?;
/// registry.save("diary", "hello", &password)?;
/// assert_eq!(registry.decrypt("diary", &password)?, "hello");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct NoteRegistry<S: Storage = LocalStorage> {
    dir: PathBuf,
    notes: BTreeMap<String, PathBuf>,
    storage: S,
}

impl NoteRegistry<LocalStorage> {
    /// Opens the registry for `dir` on the local filesystem, creating the
    /// directory if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> NoteResult<Self> {
        Self::with_storage(dir, LocalStorage)
    }
}

impl<S: Storage> NoteRegistry<S> {
    /// Opens the registry for `dir` using a custom storage backend.
    pub fn with_storage(dir: impl Into<PathBuf>, storage: S) -> NoteResult<Self> {
        let dir = dir.into();
        storage.ensure_dir(&dir)?;

        let mut notes = BTreeMap::new();
        for file_name in storage.list(&dir)? {
            let Some(name) = name_from_file_name(&file_name) else {
                continue;
            };
            if let Err(e) = validate_name(name) {
                warn!("Ignoring note file with unusable name: {}", e);
                continue;
            }
            notes.insert(name.to_string(), dir.join(&file_name));
        }

        info!("Loaded {} notes", notes.len());
        Ok(Self {
            dir,
            notes,
            storage,
        })
    }

    /// The directory this registry stores notes in.
    pub fn storage_dir(&self) -> &Path {
        &self.dir
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Registered note names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.notes.keys().map(String::as_str)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.notes.contains_key(name)
    }

    /// File backing `name`, if registered.
    pub fn location(&self, name: &str) -> Option<&Path> {
        self.notes.get(name).map(PathBuf::as_path)
    }

    /// Number of registered notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether no notes are registered.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Creates an empty note encrypted under `password`.
    ///
    /// # Errors
    ///
    /// - `NoteError::InvalidName` if `name` cannot be used as a file name
    /// - `NoteError::DuplicateName` if `name` is already registered, or a file
    ///   already sits where the note would be written
    /// - `NoteError::Storage` if the file cannot be written
    pub fn create(&mut self, name: &str, password: &SecretString) -> NoteResult<()> {
        self.check_free(name)?;

        let path = self.path_for(name);
        let token = crypto::encrypt(b"", &derive_key(password))?;
        self.storage.write(&path, token.as_bytes())?;
        self.notes.insert(name.to_string(), path);

        info!("Created note");
        Ok(())
    }

    /// Encrypts `content` under `password` and replaces the note's file.
    ///
    /// The password may differ from the one used before; the old one stops
    /// working once this returns.
    pub fn save(&mut self, name: &str, content: &str, password: &SecretString) -> NoteResult<()> {
        let path = self.require(name)?.to_path_buf();
        let token = crypto::encrypt(content.as_bytes(), &derive_key(password))?;
        self.storage.write(&path, token.as_bytes())?;

        debug!("Saved note ({} bytes of plaintext)", content.len());
        Ok(())
    }

    /// Decrypts a note's body.
    ///
    /// This is also the only way to check a password: there is no separate
    /// verification step.
    ///
    /// # Errors
    ///
    /// - `NoteError::NotFound` if `name` is not registered
    /// - `NoteError::Authentication` if the password is wrong or the file is damaged
    /// - `NoteError::Storage` if the file cannot be read
    pub fn decrypt(&self, name: &str, password: &SecretString) -> NoteResult<String> {
        let path = self.require(name)?;
        let token = self.storage.read(path)?;
        open_token(&token, password)
    }

    /// Deletes a note's file and drops it from the index.
    ///
    /// A registered note whose file has already disappeared is simply dropped.
    pub fn delete(&mut self, name: &str) -> NoteResult<()> {
        let path = self.require(name)?.to_path_buf();
        self.storage.remove(&path)?;
        self.notes.remove(name);

        info!("Deleted note");
        Ok(())
    }

    /// Renames a note, moving its file. Content and password are untouched.
    ///
    /// # Errors
    ///
    /// - `NoteError::NotFound` if `old` is not registered
    /// - `NoteError::InvalidName` if `new` cannot be used as a file name
    /// - `NoteError::DuplicateName` if `new` is already registered or its file exists
    /// - `NoteError::Storage` if the file cannot be moved
    pub fn rename(&mut self, old: &str, new: &str) -> NoteResult<()> {
        let from = self.require(old)?.to_path_buf();
        self.check_free(new)?;

        let to = self.path_for(new);
        self.storage.rename(&from, &to)?;
        self.notes.remove(old);
        self.notes.insert(new.to_string(), to);

        info!("Renamed note");
        Ok(())
    }

    /// Changes the password of a note after checking the current one.
    pub fn change_password(
        &mut self,
        name: &str,
        current: &SecretString,
        new_password: &SecretString,
    ) -> NoteResult<()> {
        let content = self.decrypt(name, current)?;
        self.save(name, &content, new_password)?;

        info!("Changed note password");
        Ok(())
    }

    /// Renames a note and re-encrypts it under a new password in one step.
    ///
    /// The body is written under `new` first; the old file is removed only
    /// after that write succeeded. If removing the old file fails, the new file
    /// is removed again and the registry is left as it was.
    pub fn rename_with_password(
        &mut self,
        old: &str,
        new: &str,
        current: &SecretString,
        new_password: &SecretString,
    ) -> NoteResult<()> {
        let from = self.require(old)?.to_path_buf();
        self.check_free(new)?;
        let content = self.decrypt(old, current)?;

        let to = self.path_for(new);
        let token = crypto::encrypt(content.as_bytes(), &derive_key(new_password))?;
        self.storage.write(&to, token.as_bytes())?;

        if let Err(e) = self.storage.remove(&from) {
            if let Err(cleanup) = self.storage.remove(&to) {
                warn!("Failed to roll back partially renamed note: {}", cleanup);
            }
            return Err(e);
        }

        self.notes.remove(old);
        self.notes.insert(new.to_string(), to);

        info!("Renamed note and changed its password");
        Ok(())
    }

    /// Imports an exported note file, returning the name it was registered under.
    ///
    /// The token is checked against `password` before anything is written. The
    /// name comes from the source file name with the note extension stripped;
    /// if taken, `_1`, `_2`, … are appended until a free name is found. The
    /// token is stored exactly as read.
    ///
    /// # Errors
    ///
    /// - `NoteError::Authentication` if the token does not decrypt under `password`
    /// - `NoteError::Storage` if the source cannot be read or the copy cannot be written
    pub fn import(&mut self, source: &Path, password: &SecretString) -> NoteResult<String> {
        let token = self.storage.read(source)?;
        open_token(&token, password)?;

        let base = import_base_name(source);
        let name = first_free_name(&base, |candidate| self.is_taken(candidate))?;

        let path = self.path_for(&name);
        self.storage.write(&path, &token)?;
        self.notes.insert(name.clone(), path);

        info!("Imported note");
        Ok(name)
    }

    /// Copies a note's stored token to `destination`, byte for byte.
    ///
    /// Nothing is decrypted; the exported file opens with the note's password.
    ///
    /// # Errors
    ///
    /// - `NoteError::NotFound` if `name` is not registered
    /// - `NoteError::DuplicateName` if `destination` is another note's file in
    ///   the notes directory
    /// - `NoteError::InvalidName` if `destination` would add an unregistered
    ///   note file to the notes directory
    /// - `NoteError::Storage` if the token cannot be read or written
    pub fn export(&self, name: &str, destination: &Path) -> NoteResult<()> {
        let path = self.require(name)?;
        self.check_export_destination(path, destination)?;
        let token = self.storage.read(path)?;
        self.storage.write(destination, &token)?;

        info!("Exported note");
        Ok(())
    }

    /// When the note was last saved, as recorded in its token.
    ///
    /// Read without a password, so the value is not authenticated.
    pub fn issued_at(&self, name: &str) -> NoteResult<DateTime<Utc>> {
        let path = self.require(name)?;
        let token = self.storage.read(path)?;
        let token = std::str::from_utf8(&token).map_err(|_| NoteError::Authentication)?;
        Ok(crypto::issued_at(token)?)
    }

    fn require(&self, name: &str) -> NoteResult<&Path> {
        self.location(name).ok_or_else(|| NoteError::NotFound {
            name: name.to_string(),
        })
    }

    /// Checks that `name` is usable and that writing it would not clobber
    /// anything, including a file the index does not know about (a different
    /// case of a registered name on case-insensitive filesystems).
    fn check_free(&self, name: &str) -> NoteResult<()> {
        validate_name(name)?;
        if self.is_taken(name)? {
            return Err(NoteError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn is_taken(&self, name: &str) -> NoteResult<bool> {
        if self.contains(name) {
            return Ok(true);
        }
        self.storage.exists(&self.path_for(name))
    }

    /// Rejects exports that would put a note file into the notes directory
    /// behind the index's back.
    fn check_export_destination(&self, source: &Path, destination: &Path) -> NoteResult<()> {
        let Some(file_name) = destination.file_name().and_then(|f| f.to_str()) else {
            return Ok(());
        };
        let Some(target) = name_from_file_name(file_name) else {
            return Ok(());
        };
        if !self.is_in_storage_dir(destination) || same_file(source, destination) {
            return Ok(());
        }

        if self.contains(target) {
            return Err(NoteError::DuplicateName {
                name: target.to_string(),
            });
        }
        Err(NoteError::InvalidName {
            name: target.to_string(),
            reason: "export destination is inside the notes directory".to_string(),
        })
    }

    fn is_in_storage_dir(&self, path: &Path) -> bool {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        same_file(parent, &self.dir)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(file_name_for(name))
    }
}

/// Decrypts a stored token into note text.
fn open_token(token: &[u8], password: &SecretString) -> NoteResult<String> {
    // Tokens are ASCII; anything else is not one of ours.
    let token = std::str::from_utf8(token).map_err(|_| NoteError::Authentication)?;
    let plaintext = crypto::decrypt(token, &derive_key(password))?;
    String::from_utf8(plaintext).map_err(|_| NoteError::Authentication)
}

/// Whether two paths name the same location, resolving links and `..` when
/// both exist.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// File name that stores `name`.
pub fn file_name_for(name: &str) -> String {
    format!("{}{}", name, NOTE_FILE_EXTENSION)
}

/// Note name stored in `file_name`, or `None` if it is not a note file.
pub fn name_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(NOTE_FILE_EXTENSION)
        .filter(|name| !name.is_empty())
}

/// Checks that `name` can be used as a note file name.
///
/// Names are otherwise free-form and case-sensitive.
pub fn validate_name(name: &str) -> NoteResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty".to_string())
    } else if name == "." || name == ".." {
        Some("name is a relative path component".to_string())
    } else {
        name.chars()
            .find(|c| NOTE_NAME_FORBIDDEN_CHARS.contains(c))
            .map(|c| format!("contains {:?}", c))
    };

    match reason {
        Some(reason) => Err(NoteError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Derives the base name for an imported file.
fn import_base_name(source: &Path) -> String {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(NOTE_FILE_EXTENSION)
        .unwrap_or(&file_name);

    if validate_name(stem).is_ok() {
        stem.to_string()
    } else {
        IMPORT_FALLBACK_NAME.to_string()
    }
}

/// First of `base`, `base_1`, `base_2`, … for which `taken` is false.
fn first_free_name(
    base: &str,
    mut taken: impl FnMut(&str) -> NoteResult<bool>,
) -> NoteResult<String> {
    if !taken(base)? {
        return Ok(base.to_string());
    }
    for n in 1u64.. {
        let candidate = format!("{}_{}", base, n);
        if !taken(&candidate)? {
            return Ok(candidate);
        }
    }
    Ok(base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_name_roundtrip() {
        assert_eq!(file_name_for("diary"), "diary.encryptednote");
        assert_eq!(name_from_file_name("diary.encryptednote"), Some("diary"));
        assert_eq!(name_from_file_name("Diary.encryptednote"), Some("Diary"));
    }

    #[test]
    fn test_name_from_file_name_ignores_other_files() {
        assert_eq!(name_from_file_name("notes.txt"), None);
        assert_eq!(name_from_file_name(".encryptednote"), None);
        assert_eq!(name_from_file_name(".sealnote-abc.tmp"), None);
        assert_eq!(name_from_file_name("diary.encryptednote.bak"), None);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("diary").is_ok());
        assert!(validate_name("My Notes 2024").is_ok());
        assert!(validate_name("with.dots").is_ok());

        for bad in ["", ".", "..", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(validate_name(bad), Err(NoteError::InvalidName { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_first_free_name_is_linear_and_deterministic() {
        let mut taken = HashSet::new();
        let pick = |taken: &HashSet<String>| {
            first_free_name("note", |n| Ok(taken.contains(n))).unwrap()
        };
        assert_eq!(pick(&taken), "note");

        taken.insert("note".to_string());
        assert_eq!(pick(&taken), "note_1");

        taken.insert("note_1".to_string());
        taken.insert("note_3".to_string());
        assert_eq!(pick(&taken), "note_2");
    }

    #[test]
    fn test_first_free_name_propagates_errors() {
        let result = first_free_name("note", |_| {
            Err(NoteError::storage(
                "/notes",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ))
        });
        assert!(matches!(result, Err(NoteError::Storage { .. })));
    }

    #[test]
    fn test_import_base_name() {
        assert_eq!(
            import_base_name(Path::new("/tmp/export/note.encryptednote")),
            "note"
        );
        assert_eq!(import_base_name(Path::new("/tmp/backup.txt")), "backup.txt");
        assert_eq!(
            import_base_name(Path::new("/tmp/.encryptednote")),
            IMPORT_FALLBACK_NAME
        );
        assert_eq!(import_base_name(Path::new("/")), IMPORT_FALLBACK_NAME);
    }
}
