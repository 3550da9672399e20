//! Conversion to and from third-party credential-manager formats.
//!
//! Adapters work on plaintext `CredentialEntry` / `Note` values only;
//! the vault engine never sees the foreign schema.

pub mod bitwarden;
