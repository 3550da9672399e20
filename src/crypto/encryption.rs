//! AES-256-CBC field encryption with PKCS#7 padding.
//!
//! Two layouts are supported, both carried as standard base64 text:
//!
//! - `encrypt` / `decrypt` take the IV from the caller.  Vaults written
//!   by older releases share one IV across every field and use this form.
//! - `seal` / `unseal` draw a fresh random IV per call and prepend it:
//!
//! ```text
//! base64( [ 16-byte IV | ciphertext (n * 16 bytes) ] )
//! ```
//!
//! There is no authentication tag.  A wrong key is detected through the
//! padding check and UTF-8 validation, which is why every decryption
//! failure collapses into `VaultError::DecryptionFailed`.

use aes::Aes256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Size of the CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
const BLOCK_LEN: usize = 16;

/// Generate a cryptographically random 16-byte IV.
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);
    iv
}

/// Encrypt `plaintext` under `key` and `iv`, returning base64 text.
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &str) -> Result<String> {
    let ciphertext = encrypt_bytes(key, iv, plaintext.as_bytes())?;
    Ok(BASE64.encode(ciphertext))
}

/// Decrypt base64 text produced by `encrypt` with the same `key` and `iv`.
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext_b64: &str) -> Result<String> {
    let ciphertext = BASE64
        .decode(ciphertext_b64)
        .map_err(|_| VaultError::DecryptionFailed)?;
    let plaintext = decrypt_bytes(key, iv, &ciphertext)?;
    into_utf8(plaintext)
}

/// Encrypt `plaintext` under a freshly generated IV and return
/// `base64(iv || ciphertext)`.
pub fn seal(key: &[u8], plaintext: &str) -> Result<String> {
    let iv = generate_iv();
    let ciphertext = encrypt_bytes(key, &iv, plaintext.as_bytes())?;

    let mut output = Vec::with_capacity(IV_LEN + ciphertext.len());
    output.extend_from_slice(&iv);
    output.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(output))
}

/// Decrypt text produced by `seal`.
pub fn unseal(key: &[u8], sealed_b64: &str) -> Result<String> {
    let data = BASE64
        .decode(sealed_b64)
        .map_err(|_| VaultError::DecryptionFailed)?;

    // IV plus at least one padded block.
    if data.len() < IV_LEN + BLOCK_LEN {
        return Err(VaultError::DecryptionFailed);
    }

    let (iv, ciphertext) = data.split_at(IV_LEN);
    let plaintext = decrypt_bytes(key, iv, ciphertext)?;
    into_utf8(plaintext)
}

fn encrypt_bytes(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key or IV length: {e}")))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn decrypt_bytes(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(VaultError::DecryptionFailed);
    }

    let cipher =
        Aes256CbcDec::new_from_slices(key, iv).map_err(|_| VaultError::DecryptionFailed)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}

/// Convert decrypted bytes to a `String`, wiping them if they are not UTF-8.
fn into_utf8(plaintext: Vec<u8>) -> Result<String> {
    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        VaultError::DecryptionFailed
    })
}
