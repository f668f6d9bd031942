// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::HubConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Length in hex digits of a 32-byte master key.
const MASTER_KEY_HEX_LEN: usize = 64;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &HubConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.server.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` must be one of: {}",
                config.server.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.vault.credential_fields.is_empty() {
        errors.push(ConfigError::Validation {
            message: "vault.credential_fields must list at least one field".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (i, field) in config.vault.credential_fields.iter().enumerate() {
        if field.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("vault.credential_fields[{i}] must not be empty"),
            });
        } else if !seen.insert(field.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate credential field `{field}` in vault.credential_fields"),
            });
        }
    }

    // Only the shape is checked here; the key value never appears in messages.
    if let Some(key) = &config.vault.encryption_key {
        let key = key.trim();
        if key.len() != MASTER_KEY_HEX_LEN || !key.chars().all(|c| c.is_ascii_hexdigit()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "vault.encryption_key must be {MASTER_KEY_HEX_LEN} hex characters (32 bytes)"
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VaultConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&HubConfig::default()).is_ok());
    }

    #[test]
    fn unknown_log_level_rejected() {
        let mut config = HubConfig::default();
        config.server.log_level = "loud".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("server.log_level"));
    }

    #[test]
    fn empty_and_duplicate_credential_fields_rejected() {
        let mut config = HubConfig::default();
        config.vault.credential_fields =
            vec!["password".into(), " ".into(), "password".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn empty_allowlist_rejected() {
        let mut config = HubConfig::default();
        config.vault.credential_fields.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn malformed_key_rejected_without_echoing_it() {
        let config = HubConfig {
            vault: VaultConfig {
                encryption_key: Some("not-hex-secret".into()),
                ..VaultConfig::default()
            },
            ..HubConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        let msg = errors[0].to_string();
        assert!(msg.contains("vault.encryption_key"));
        assert!(!msg.contains("not-hex-secret"));
    }

    #[test]
    fn well_formed_key_accepted() {
        let mut config = HubConfig::default();
        config.vault.encryption_key = Some("0f".repeat(32));
        assert!(validate_config(&config).is_ok());
    }
}
