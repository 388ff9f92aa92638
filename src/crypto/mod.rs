//! Cryptographic operations for note encryption.
//!
//! # Module Structure
//!
//! - `key`: Password-to-key derivation
//! - `token`: Authenticated encryption into self-describing text tokens
//! - `temp`: Secure temporary file handling with tmpfs preference
//!
//! # Example
//!
//! ```
//! use sealnote::crypto::{decrypt, derive_key, encrypt};
//! use secrecy::SecretString;
//!
//! let key = derive_key(&SecretString::new("my-secret-password".to_string()));
//!
//! let plaintext = b"Secret note";
//! let token = encrypt(plaintext, &key)?;
//! let decrypted = decrypt(&token, &key)?;
//! assert_eq!(plaintext, decrypted.as_slice());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod key;
pub mod temp;
pub mod token;

// Re-export commonly used types
pub use self::key::{derive_key, NoteKey};
pub use self::temp::{get_secure_temp_dir, secure_delete, ScratchFile};
pub use self::token::{decrypt, encrypt, issued_at};
