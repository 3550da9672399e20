//! Cryptographic primitives for SecureVault.
//!
//! This module provides:
//! - AES-256-CBC field encryption and decryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The zeroizing `MasterKey` wrapper (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, generate_iv, seal, unseal, IV_LEN};
pub use kdf::{
    derive_key, derive_key_with_iterations, generate_salt, DEFAULT_ITERATIONS, MAX_ITERATIONS,
    MIN_ITERATIONS, SALT_LEN,
};
pub use keys::{MasterKey, KEY_LEN};
