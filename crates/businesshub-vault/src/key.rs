// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide master key.
//!
//! Read once at startup from `vault.encryption_key` or the `ENCRYPTION_KEY`
//! environment variable, hex-decoded, and held in zeroize-on-drop memory.
//! The key is never logged and has no accessor that returns it as text.

use businesshub_config::VaultConfig;
use businesshub_core::HubError;
use zeroize::Zeroizing;

use crate::crypto;

/// Environment variable consulted when `vault.encryption_key` is unset.
pub const ENCRYPTION_KEY_ENV_VAR: &str = "ENCRYPTION_KEY";

/// Length of the raw master key material in bytes.
pub const MASTER_KEY_LEN: usize = 32;

/// Raw master key material. Debug output is redacted.
#[derive(Clone)]
pub struct MasterKey {
    bytes: Zeroizing<[u8; MASTER_KEY_LEN]>,
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl MasterKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; MASTER_KEY_LEN]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Decode a hex-encoded key. Surrounding whitespace is ignored.
    ///
    /// The error message never contains the input.
    pub fn from_hex(encoded: &str) -> Result<Self, HubError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(HubError::Config("encryption key is empty".to_string()));
        }
        if encoded.len() != MASTER_KEY_LEN * 2 {
            return Err(HubError::Config(format!(
                "encryption key must be {} hex characters ({MASTER_KEY_LEN} bytes), got {}",
                MASTER_KEY_LEN * 2,
                encoded.len()
            )));
        }

        let mut bytes = Zeroizing::new([0u8; MASTER_KEY_LEN]);
        hex::decode_to_slice(encoded, &mut bytes[..])
            .map_err(|_| HubError::Config("encryption key is not valid hex".to_string()))?;
        Ok(Self { bytes })
    }

    /// Resolve the key from configuration, falling back to `ENCRYPTION_KEY`.
    ///
    /// Absence is a fatal configuration error: the vault refuses to operate
    /// without a key.
    pub fn from_config(config: &VaultConfig) -> Result<Self, HubError> {
        if let Some(encoded) = config.encryption_key.as_deref()
            && !encoded.trim().is_empty()
        {
            return Self::from_hex(encoded);
        }

        match std::env::var(ENCRYPTION_KEY_ENV_VAR) {
            Ok(encoded) if !encoded.trim().is_empty() => Self::from_hex(&encoded),
            _ => Err(HubError::Config(format!(
                "no encryption key configured. Set vault.encryption_key, \
                 BUSINESSHUB_VAULT_ENCRYPTION_KEY, or {ENCRYPTION_KEY_ENV_VAR}"
            ))),
        }
    }

    /// Generate a fresh random key from the system CSPRNG.
    pub fn generate() -> Result<Self, HubError> {
        let mut bytes = Zeroizing::new([0u8; MASTER_KEY_LEN]);
        crypto::fill_random(&mut bytes[..])?;
        Ok(Self { bytes })
    }

    /// Hex encoding for handing a freshly generated key to an operator.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.bytes[..]))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; MASTER_KEY_LEN] {
        &self.bytes
    }
}
