// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Applies the credential cipher to the allowlisted fields of
//! `config.credentials`, leaving everything else structurally identical.
//!
//! Writes fail closed: any field that cannot be encrypted fails the whole
//! call, so no secret is persisted in plaintext. Reads degrade per field: a
//! field that cannot be decrypted keeps its stored value and is reported in
//! [`RevealedConfig::outcomes`], while the other fields still decrypt.

use std::collections::BTreeMap;

use businesshub_config::VaultConfig;
use businesshub_core::HubError;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::cipher::CredentialCipher;

/// Key of the nested object holding credentials inside a configuration.
pub const CREDENTIALS_KEY: &str = "credentials";

/// Names that look like secrets across the integration types (portal,
/// Meshtastic, API, Stripe, QuickBooks, Microsoft 365, webhooks).
///
/// Used only for auditing; membership here does not cause encryption.
pub const CREDENTIAL_SHAPED_FIELDS: &[&str] = &[
    "password",
    "passwordEncrypted",
    "apiKey",
    "apiSecret",
    "accessToken",
    "refreshToken",
    "clientId",
    "clientSecret",
    "tenantId",
    "webhookSecret",
    "meshtasticApiKey",
];

/// Result of decrypting one credential field.
#[derive(Debug)]
pub enum FieldOutcome {
    Decrypted,
    /// The field kept its stored value.
    Failed(HubError),
}

impl FieldOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Serializes as `"decrypted"` or `"failed"` only; the error stays server-side.
impl Serialize for FieldOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Self::Decrypted => "decrypted",
            Self::Failed(_) => "failed",
        })
    }
}

/// A configuration after [`CredentialMapper::decrypt_fields`].
#[derive(Debug)]
pub struct RevealedConfig {
    pub config: Value,
    /// One entry per recognized field that was present and non-empty.
    pub outcomes: BTreeMap<String, FieldOutcome>,
}

impl RevealedConfig {
    /// True when at least one field could not be decrypted.
    pub fn is_degraded(&self) -> bool {
        self.outcomes.values().any(FieldOutcome::is_failed)
    }

    pub fn failed_fields(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_failed())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Encrypts and decrypts the recognized credential fields of a configuration.
#[derive(Debug, Clone)]
pub struct CredentialMapper {
    cipher: CredentialCipher,
    fields: Vec<String>,
}

impl CredentialMapper {
    pub fn new(cipher: CredentialCipher, fields: Vec<String>) -> Self {
        Self { cipher, fields }
    }

    /// Build from configuration: master key plus the `credential_fields` allowlist.
    pub fn from_config(config: &VaultConfig) -> Result<Self, HubError> {
        Ok(Self::new(
            CredentialCipher::from_config(config)?,
            config.credential_fields.clone(),
        ))
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn cipher(&self) -> &CredentialCipher {
        &self.cipher
    }

    /// Return a copy of `config` with every recognized, non-empty credential
    /// field encrypted.
    ///
    /// `config` is returned unchanged when it has no `credentials` object.
    /// A recognized field holding a non-string value is an error.
    pub fn encrypt_fields(&self, config: &Value) -> Result<Value, HubError> {
        let Some(credentials) = credentials_of(config) else {
            return Ok(config.clone());
        };

        for path in self.audit_fields(config) {
            warn!(field = %path, "credential-shaped field is not in the encryption allowlist");
        }

        let mut encrypted = credentials.clone();
        for name in &self.fields {
            let Some(value) = credentials.get(name) else {
                continue;
            };
            if is_falsy(value) {
                continue;
            }
            let Value::String(plaintext) = value else {
                return Err(HubError::Encryption(format!(
                    "credential field `{name}` must be a string"
                )));
            };
            encrypted.insert(name.clone(), Value::String(self.cipher.encrypt(plaintext)?));
            debug!(field = %name, "credential field encrypted");
        }

        Ok(with_credentials(config, encrypted))
    }

    /// Return a copy of `config` with every recognized credential field
    /// decrypted where possible.
    ///
    /// Never fails as a whole; see [`RevealedConfig::outcomes`].
    pub fn decrypt_fields(&self, config: &Value) -> RevealedConfig {
        let mut outcomes = BTreeMap::new();
        let Some(credentials) = credentials_of(config) else {
            return RevealedConfig {
                config: config.clone(),
                outcomes,
            };
        };

        let mut decrypted = credentials.clone();
        for name in &self.fields {
            let Some(value) = credentials.get(name) else {
                continue;
            };
            if is_falsy(value) {
                continue;
            }

            let result = match value {
                Value::String(serialized) => self.cipher.decrypt(serialized),
                _ => Err(HubError::Format(format!(
                    "credential field `{name}` is not a string"
                ))),
            };
            let outcome = match result {
                Ok(plaintext) => {
                    decrypted.insert(name.clone(), Value::String(plaintext));
                    debug!(field = %name, "credential field decrypted");
                    FieldOutcome::Decrypted
                }
                Err(err) => {
                    warn!(
                        field = %name,
                        error = err.kind(),
                        "credential field could not be decrypted; returning stored value"
                    );
                    FieldOutcome::Failed(err)
                }
            };
            outcomes.insert(name.clone(), outcome);
        }

        RevealedConfig {
            config: with_credentials(config, decrypted),
            outcomes,
        }
    }

    /// Credential-shaped fields this mapper will leave in plaintext.
    /// See [`audit_fields`].
    pub fn audit_fields(&self, config: &Value) -> Vec<String> {
        audit_fields(&self.fields, config)
    }
}

/// List credential-shaped fields holding a value that `allowlist` does not
/// cover, as dotted paths.
///
/// Covers names under `credentials` outside the allowlist and any
/// credential-shaped name at the top level of `config`, which is never
/// encrypted.
pub fn audit_fields(allowlist: &[String], config: &Value) -> Vec<String> {
    let mut findings = Vec::new();
    let Value::Object(top) = config else {
        return findings;
    };

    if let Some(credentials) = credentials_of(config) {
        for name in CREDENTIAL_SHAPED_FIELDS {
            let covered = allowlist.iter().any(|f| f == name);
            if !covered && credentials.get(*name).is_some_and(|v| !is_falsy(v)) {
                findings.push(format!("{CREDENTIALS_KEY}.{name}"));
            }
        }
    }

    for name in CREDENTIAL_SHAPED_FIELDS {
        if top.get(*name).is_some_and(|v| !is_falsy(v)) {
            findings.push((*name).to_string());
        }
    }

    findings
}

fn credentials_of(config: &Value) -> Option<&Map<String, Value>> {
    config.get(CREDENTIALS_KEY).and_then(Value::as_object)
}

fn with_credentials(config: &Value, credentials: Map<String, Value>) -> Value {
    let mut out = config.clone();
    if let Value::Object(map) = &mut out {
        map.insert(CREDENTIALS_KEY.to_string(), Value::Object(credentials));
    }
    out
}

/// JSON values that a form treats as "not provided".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::key::MasterKey;

    fn mapper() -> CredentialMapper {
        CredentialMapper::new(
            CredentialCipher::new(MasterKey::from_bytes([7u8; 32])),
            businesshub_config::DEFAULT_CREDENTIAL_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn absent_credentials_returned_unchanged() {
        let config = json!({ "portalUrl": "https://portal.example", "mapZoom": 4 });
        let m = mapper();
        assert_eq!(m.encrypt_fields(&config).unwrap(), config);

        let revealed = m.decrypt_fields(&config);
        assert_eq!(revealed.config, config);
        assert!(revealed.outcomes.is_empty());
    }

    #[test]
    fn non_object_inputs_pass_through() {
        let m = mapper();
        for config in [json!(null), json!("x"), json!({ "credentials": "flat" })] {
            assert_eq!(m.encrypt_fields(&config).unwrap(), config);
        }
    }

    #[test]
    fn falsy_fields_left_alone() {
        let config = json!({
            "credentials": { "password": "", "apiSecret": null, "accessToken": false, "refreshToken": 0 }
        });
        let m = mapper();
        assert_eq!(m.encrypt_fields(&config).unwrap(), config);
        assert!(m.decrypt_fields(&config).outcomes.is_empty());
    }

    #[test]
    fn non_string_secret_fails_closed() {
        let config = json!({ "credentials": { "password": { "nested": true } } });
        let err = mapper().encrypt_fields(&config).unwrap_err();
        assert!(matches!(err, HubError::Encryption(_)));
    }

    #[test]
    #[traced_test]
    fn failed_field_is_logged_without_secret() {
        let config = json!({ "credentials": { "password": "plainly-not-ciphertext" } });
        let revealed = mapper().decrypt_fields(&config);

        assert!(revealed.is_degraded());
        assert_eq!(revealed.failed_fields(), vec!["password"]);
        assert!(logs_contain("credential field could not be decrypted"));
        assert!(!logs_contain("plainly-not-ciphertext"));
    }

    #[test]
    fn non_string_stored_value_is_format_failure() {
        let config = json!({ "credentials": { "accessToken": 12345 } });
        let revealed = mapper().decrypt_fields(&config);
        match revealed.outcomes.get("accessToken") {
            Some(FieldOutcome::Failed(HubError::Format(_))) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(revealed.config, config);
    }

    #[test]
    fn outcomes_serialize_without_error_detail() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert("password".to_string(), FieldOutcome::Decrypted);
        outcomes.insert(
            "apiSecret".to_string(),
            FieldOutcome::Failed(HubError::Authentication),
        );
        let json = serde_json::to_value(&outcomes).unwrap();
        assert_eq!(json, json!({ "apiSecret": "failed", "password": "decrypted" }));
    }

    #[test]
    fn audit_reports_uncovered_fields() {
        let config = json!({
            "apiKey": "top-level-key",
            "apiSecret": "top-level-secret",
            "portalUrl": "https://x",
            "credentials": {
                "username": "ops",
                "password": "p",
                "clientSecret": "cs",
                "webhookSecret": "",
                "tenantId": "t"
            }
        });
        let findings = mapper().audit_fields(&config);
        assert_eq!(
            findings,
            vec![
                "credentials.clientSecret",
                "credentials.tenantId",
                "apiKey",
                "apiSecret"
            ]
        );
    }

    #[test]
    fn widened_allowlist_covers_more_fields() {
        let m = CredentialMapper::new(
            CredentialCipher::new(MasterKey::from_bytes([7u8; 32])),
            vec!["password".into(), "clientSecret".into()],
        );
        let config = json!({ "credentials": { "clientSecret": "cs" } });
        assert!(m.audit_fields(&config).is_empty());

        let encrypted = m.encrypt_fields(&config).unwrap();
        assert_ne!(encrypted["credentials"]["clientSecret"], "cs");
    }
}
