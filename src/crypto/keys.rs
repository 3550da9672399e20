//! The in-memory master key.

use std::fmt;

use zeroize::Zeroize;

/// Length of the AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// A wrapper around the 32-byte master key that automatically zeroes
/// its memory when dropped.
///
/// It is deliberately not `Clone`: exactly one copy lives inside the
/// `VaultStore` that derived it.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let key = MasterKey::new([0x41; KEY_LEN]);
        let shown = format!("{key:?}");
        assert_eq!(shown, "MasterKey([REDACTED])");
    }
}
