//! Note tokens.
//!
//! A token is a Fernet token: the URL-safe base64 encoding of
//!
//! ```text
//! version 0x80 (1) | issued_at, unix seconds, big-endian (8) | IV (16) | AES-128-CBC ciphertext | HMAC-SHA256 (32)
//! ```
//!
//! The Fernet key is the URL-safe base64 encoding of the 32-byte [`NoteKey`],
//! which is how note files have always been keyed, so existing files and
//! exports open unchanged. A fresh random IV per call makes repeated
//! encryptions of the same body produce different tokens.

use crate::constants::{CIPHER_BLOCK_LEN, HMAC_LEN, IV_LEN, TOKEN_HEADER_LEN, TOKEN_VERSION};
use crate::crypto::key::NoteKey;
use crate::errors::CryptoError;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use fernet::Fernet;
use zeroize::Zeroizing;

const MIN_TOKEN_LEN: usize = TOKEN_HEADER_LEN + IV_LEN + CIPHER_BLOCK_LEN + HMAC_LEN;

/// Encrypts `plaintext` under `key`, stamping the token with the current time.
///
/// # Example
///
/// ```
/// use sealnote::crypto::{decrypt, derive_key, encrypt};
/// use secrecy::SecretString;
///
/// let key = derive_key(&SecretString::new("p1".to_string()));
/// let token = encrypt(b"hello", &key)?;
/// assert_eq!(decrypt(&token, &key)?, b"hello");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encrypt(plaintext: &[u8], key: &NoteKey) -> Result<String, CryptoError> {
    encrypt_at(plaintext, key, Utc::now())
}

/// Encrypts with an explicit issue time.
pub(crate) fn encrypt_at(
    plaintext: &[u8],
    key: &NoteKey,
    issued_at: DateTime<Utc>,
) -> Result<String, CryptoError> {
    // Clocks before the epoch are stamped as zero.
    let seconds = u64::try_from(issued_at.timestamp()).unwrap_or(0);
    Ok(cipher(key)?.encrypt_at_time(plaintext, seconds))
}

/// Decrypts a token produced by [`encrypt`].
///
/// No time-to-live is applied; a token stays valid however old it is.
///
/// # Errors
///
/// Returns `CryptoError::MalformedToken` if the token cannot be parsed and
/// `CryptoError::Authentication` if it does not verify under `key`.
pub fn decrypt(token: &str, key: &NoteKey) -> Result<Vec<u8>, CryptoError> {
    let token = token.trim();
    decode(token)?;
    cipher(key)?
        .decrypt(token)
        .map_err(|_| CryptoError::Authentication)
}

/// Reads the issue time recorded in a token without decrypting it.
///
/// The timestamp is only authenticated by a successful [`decrypt`]; treat it as
/// informational until then.
pub fn issued_at(token: &str) -> Result<DateTime<Utc>, CryptoError> {
    let raw = decode(token.trim())?;
    let mut seconds = [0u8; 8];
    seconds.copy_from_slice(&raw[1..TOKEN_HEADER_LEN]);
    let seconds = i64::try_from(u64::from_be_bytes(seconds))
        .map_err(|_| CryptoError::MalformedToken("timestamp out of range".to_string()))?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| CryptoError::MalformedToken("timestamp out of range".to_string()))
}

fn cipher(key: &NoteKey) -> Result<Fernet, CryptoError> {
    let encoded = Zeroizing::new(URL_SAFE.encode(key.as_bytes()));
    Fernet::new(&encoded)
        .ok_or_else(|| CryptoError::EncryptionFailed("key is not 32 bytes".to_string()))
}

/// Structural checks the cipher would otherwise report as a bare failure.
fn decode(token: &str) -> Result<Vec<u8>, CryptoError> {
    let raw = URL_SAFE
        .decode(token)
        .map_err(|e| CryptoError::MalformedToken(e.to_string()))?;

    if raw.len() < MIN_TOKEN_LEN {
        return Err(CryptoError::MalformedToken(format!(
            "expected at least {} bytes, got {}",
            MIN_TOKEN_LEN,
            raw.len()
        )));
    }
    if raw[0] != TOKEN_VERSION {
        return Err(CryptoError::MalformedToken(format!(
            "unsupported version byte {:#04x}",
            raw[0]
        )));
    }
    if (raw.len() - TOKEN_HEADER_LEN - IV_LEN - HMAC_LEN) % CIPHER_BLOCK_LEN != 0 {
        return Err(CryptoError::MalformedToken(
            "ciphertext is not a whole number of blocks".to_string(),
        ));
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key::derive_key;
    use chrono::TimeZone;
    use secrecy::SecretString;

    fn key(password: &str) -> NoteKey {
        derive_key(&SecretString::new(password.to_string()))
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = key("p1");
        let token = encrypt(b"Dear diary,\nsecrets follow.", &key).unwrap();
        let plaintext = decrypt(&token, &key).unwrap();
        assert_eq!(plaintext, b"Dear diary,\nsecrets follow.");
    }

    #[test]
    fn test_empty_body_roundtrip() {
        let key = key("p1");
        let token = encrypt(b"", &key).unwrap();
        assert!(decrypt(&token, &key).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_key_fails() {
        let token = encrypt(b"secret", &key("p1")).unwrap();
        let result = decrypt(&token, &key("p2"));
        assert!(matches!(result, Err(CryptoError::Authentication)));
    }

    #[test]
    fn test_repeated_encryption_differs() {
        let key = key("p1");
        let first = encrypt(b"same body", &key).unwrap();
        let second = encrypt(b"same body", &key).unwrap();
        assert_ne!(first, second);
        assert_eq!(decrypt(&first, &key).unwrap(), b"same body");
        assert_eq!(decrypt(&second, &key).unwrap(), b"same body");
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = key("p1");
        let token = encrypt(b"secret message", &key).unwrap();
        let mut raw = URL_SAFE.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = URL_SAFE.encode(raw);

        assert!(matches!(
            decrypt(&tampered, &key),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn test_tampered_timestamp_fails() {
        let key = key("p1");
        let token = encrypt(b"secret message", &key).unwrap();
        let mut raw = URL_SAFE.decode(&token).unwrap();
        raw[8] ^= 0x01;
        let tampered = URL_SAFE.encode(raw);

        assert!(matches!(
            decrypt(&tampered, &key),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let key = key("p1");

        assert!(matches!(
            decrypt("not base64 at all!", &key),
            Err(CryptoError::MalformedToken(_))
        ));
        assert!(matches!(
            decrypt("", &key),
            Err(CryptoError::MalformedToken(_))
        ));

        let short = URL_SAFE.encode([TOKEN_VERSION; 10]);
        assert!(matches!(
            decrypt(&short, &key),
            Err(CryptoError::MalformedToken(_))
        ));

        let token = encrypt(b"body", &key).unwrap();
        let mut raw = URL_SAFE.decode(&token).unwrap();
        raw[0] = 0x91;
        let wrong_version = URL_SAFE.encode(raw);
        assert!(matches!(
            decrypt(&wrong_version, &key),
            Err(CryptoError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let key = key("p1");
        let token = encrypt(b"body", &key).unwrap();
        let padded = format!("  {}\n", token);
        assert_eq!(decrypt(&padded, &key).unwrap(), b"body");
    }

    #[test]
    fn test_token_is_text_safe() {
        let token = encrypt(&[0u8, 255, 10, 13], &key("p1")).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }

    /// Written by the Python `cryptography` Fernet implementation with the key
    /// `urlsafe_b64(sha256("p1"))` at 2023-11-14T22:13:20Z.
    const EXISTING_HELLO_TOKEN: &str =
        "gAAAAABlU_EAD3OY6cD0twgrKyMBT1a17kzH2gmqgrvrJ39O00ix-yvLUukYeKu4DtzP5j0RJ6FdIZRShQp1GAbIP6DDRHEIEQ==";

    #[test]
    fn test_existing_fernet_token_decrypts() {
        assert_eq!(decrypt(EXISTING_HELLO_TOKEN, &key("p1")).unwrap(), b"hello");
        assert_eq!(issued_at(EXISTING_HELLO_TOKEN).unwrap().timestamp(), 1_700_000_000);
        assert!(matches!(
            decrypt(EXISTING_HELLO_TOKEN, &key("p2")),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn test_token_starts_with_fernet_version() {
        let token = encrypt(b"body", &key("p1")).unwrap();
        assert!(token.starts_with("gAAAAA"));
        assert_eq!(URL_SAFE.decode(&token).unwrap()[0], TOKEN_VERSION);
    }

    #[test]
    fn test_issued_at_reads_timestamp() {
        let when = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        let token = encrypt_at(b"body", &key("p1"), when).unwrap();
        assert_eq!(issued_at(&token).unwrap(), when);
    }
}
