//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The parameter set is fixed: 16-byte random salt, 32-byte output and
//! at least 65 536 iterations.  The iteration count is stored in the
//! vault file so a vault created with a higher count re-opens with it.

use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use super::keys::{MasterKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Iteration count used when nothing else is configured.
pub const DEFAULT_ITERATIONS: u32 = 65_536;

/// Lowest iteration count we accept, for new and existing vaults alike.
pub const MIN_ITERATIONS: u32 = 65_536;

/// Highest iteration count we accept.  Keeps unlocking to a few seconds
/// even when a vault file asks for more.
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Derive the master key from a password and salt with the default
/// iteration count.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<MasterKey> {
    derive_key_with_iterations(password, salt, DEFAULT_ITERATIONS)
}

/// Derive the master key with an explicit iteration count.
///
/// The same password + salt + iterations always produce the same key.
pub fn derive_key_with_iterations(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<MasterKey> {
    if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
        return Err(VaultError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be between {MIN_ITERATIONS} and {MAX_ITERATIONS} \
             (got {iterations})"
        )));
    }
    if salt.is_empty() {
        return Err(VaultError::KeyDerivationFailed("salt cannot be empty".into()));
    }

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut bytes)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    let key = MasterKey::new(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
