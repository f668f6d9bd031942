// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for BusinessHub.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Credential field names encrypted by default inside `config.credentials`.
///
/// Other credential-shaped names (`apiKey`, `clientSecret`, `webhookSecret`,
/// ...) are not in this list and are stored as given.
pub const DEFAULT_CREDENTIAL_FIELDS: &[&str] =
    &["password", "apiSecret", "accessToken", "refreshToken"];

/// Top-level BusinessHub configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// Process-level settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Integration credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Integration credential vault configuration.
///
/// Debug output never includes the encryption key.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Hex-encoded 32-byte master key. When unset, the `ENCRYPTION_KEY`
    /// environment variable is consulted at vault construction.
    #[serde(default, skip_serializing)]
    pub encryption_key: Option<String>,

    /// Names inside `config.credentials` that are encrypted at rest.
    #[serde(default = "default_credential_fields")]
    pub credential_fields: Vec<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            encryption_key: None,
            credential_fields: default_credential_fields(),
        }
    }
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("credential_fields", &self.credential_fields)
            .finish()
    }
}

fn default_credential_fields() -> Vec<String> {
    DEFAULT_CREDENTIAL_FIELDS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
