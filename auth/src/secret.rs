use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use thiserror::Error;

/// Error type for signing secret loading.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Signing secret is missing")]
    Missing,

    #[error("Signing secret is not valid hex: {0}")]
    InvalidHex(String),

    #[error("Signing secret must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Symmetric key used to sign and verify access tokens.
///
/// Always exactly [`SigningSecret::LENGTH`] bytes. The key material is never
/// printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret([u8; SigningSecret::LENGTH]);

impl SigningSecret {
    /// Key length in bytes, matching the HS512 block size.
    pub const LENGTH: usize = 64;

    /// Decode a hex-encoded secret (upper or lower case).
    ///
    /// # Errors
    /// * `Missing` - Input is empty or whitespace
    /// * `InvalidHex` - Input contains non-hex characters or odd length
    /// * `InvalidLength` - Decoded key is not 64 bytes
    pub fn from_hex(encoded: &str) -> Result<Self, SecretError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(SecretError::Missing);
        }

        let bytes = hex::decode(encoded).map_err(|e| SecretError::InvalidHex(e.to_string()))?;
        let key: [u8; Self::LENGTH] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| SecretError::InvalidLength {
                    expected: Self::LENGTH,
                    actual: bytes.len(),
                })?;

        Ok(Self(key))
    }

    /// Generate a fresh random secret from the OS random source.
    pub fn generate() -> Self {
        let mut key = [0u8; Self::LENGTH];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    /// Upper-case hex encoding, suitable for `JWT__SECRET`.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}
