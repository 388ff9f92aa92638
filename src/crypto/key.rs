//! Password-based key derivation.
//!
//! Keys are the SHA-256 digest of the password's UTF-8 bytes, used as a Fernet
//! key (see [`crate::crypto::token`]). There is no salt, so equal passwords
//! always produce equal keys, including across notes. Changing this would make
//! existing note files unreadable; a per-note random salt stored next to the
//! token would be the way to harden it.

use crate::constants::{KEY_LEN, REDACTED_PLACEHOLDER};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric key material for one note, wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct NoteKey([u8; KEY_LEN]);

impl NoteKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrows the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NoteKey").field(&REDACTED_PLACEHOLDER).finish()
    }
}

/// Derives the key for a password.
///
/// Deterministic and infallible. Rejecting empty passwords is the caller's job.
///
/// # Example
///
/// ```
/// use sealnote::crypto::derive_key;
/// use secrecy::SecretString;
///
/// let a = derive_key(&SecretString::new("hunter2".to_string()));
/// let b = derive_key(&SecretString::new("hunter2".to_string()));
/// assert_eq!(a.as_bytes(), b.as_bytes());
/// ```
pub fn derive_key(password: &SecretString) -> NoteKey {
    let mut digest = Sha256::digest(password.expose_secret().as_bytes());
    let mut bytes = [0u8; KEY_LEN];
    bytes.copy_from_slice(&digest);
    digest.as_mut_slice().zeroize();
    NoteKey(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string())
    }

    #[test]
    fn test_derive_key_is_deterministic() {
        let first = derive_key(&secret("correct horse"));
        let second = derive_key(&secret("correct horse"));
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_derive_key_differs_per_password() {
        let first = derive_key(&secret("p1"));
        let second = derive_key(&secret("p2"));
        assert_ne!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_derive_key_is_sha256_of_password() {
        // SHA-256("abc") = ba7816bf 8f01cfea 414140de 5dae2223 ...
        let key = derive_key(&secret("abc"));
        assert_eq!(key.as_bytes().len(), KEY_LEN);
        assert_eq!(&key.as_bytes()[..4], &[0xba, 0x78, 0x16, 0xbf]);
        assert_eq!(&key.as_bytes()[28..], &[0xf2, 0x00, 0x15, 0xad]);
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let key = NoteKey::from_bytes([0xAB; KEY_LEN]);
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains(REDACTED_PLACEHOLDER));
        assert!(!debug_output.contains("171"));
    }
}
