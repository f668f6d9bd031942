// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration write and read paths.
//!
//! Create and update encrypt before anything is persisted. The list view
//! hands records back with credentials still encrypted. Only the
//! single-record detail view decrypts.

use std::collections::BTreeMap;

use businesshub_core::{HubError, Integration, IntegrationUpdate, NewIntegration};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::mapper::{CredentialMapper, FieldOutcome};

/// Message shown to users when an integration cannot be saved.
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to save integration";

/// An integration with its configuration decrypted for the viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedIntegration {
    #[serde(flatten)]
    pub integration: Integration,
    /// Per-field decrypt status; a `"failed"` field still holds its stored value.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub credential_status: BTreeMap<String, FieldOutcome>,
}

impl RevealedIntegration {
    pub fn is_degraded(&self) -> bool {
        self.credential_status.values().any(FieldOutcome::is_failed)
    }
}

/// Applies the credential mapper at the integration handlers' boundaries.
#[derive(Debug, Clone)]
pub struct IntegrationVault {
    mapper: CredentialMapper,
}

impl IntegrationVault {
    pub fn new(mapper: CredentialMapper) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &CredentialMapper {
        &self.mapper
    }

    /// Build the record to persist for a create request.
    pub fn create(&self, request: NewIntegration) -> Result<Integration, HubError> {
        let config = self.mapper.encrypt_fields(&request.config)?;
        let now = Utc::now();
        let integration = Integration {
            id: Uuid::new_v4(),
            business_id: request.business_id,
            department_id: request.department_id,
            name: request.name,
            integration_type: request.integration_type,
            description: request.description,
            config,
            is_active: request.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        info!(
            integration_id = %integration.id,
            integration_type = %integration.integration_type,
            "integration prepared for create"
        );
        Ok(integration)
    }

    /// Apply an update request to a stored record.
    ///
    /// A provided `config` replaces the stored one wholesale and is encrypted
    /// first. Without one, the stored (already encrypted) config is kept.
    pub fn update(
        &self,
        existing: Integration,
        request: IntegrationUpdate,
    ) -> Result<Integration, HubError> {
        let config = match &request.config {
            Some(config) => self.mapper.encrypt_fields(config)?,
            None => existing.config,
        };

        let integration = Integration {
            name: request.name.unwrap_or(existing.name),
            description: request.description.unwrap_or(existing.description),
            is_active: request.is_active.unwrap_or(existing.is_active),
            config,
            updated_at: Utc::now(),
            ..existing
        };
        info!(integration_id = %integration.id, "integration prepared for update");
        Ok(integration)
    }

    /// Records for the list endpoint: active only, credentials still encrypted.
    pub fn list_view(&self, records: Vec<Integration>) -> Vec<Integration> {
        records.into_iter().filter(|r| r.is_active).collect()
    }

    /// A single record for the viewer, with credentials decrypted.
    pub fn detail_view(&self, record: Integration) -> RevealedIntegration {
        let revealed = self.mapper.decrypt_fields(&record.config);
        if revealed.is_degraded() {
            warn!(
                integration_id = %record.id,
                failed = ?revealed.failed_fields(),
                "integration served with undecryptable credential fields"
            );
        }
        RevealedIntegration {
            integration: Integration {
                config: revealed.config,
                ..record
            },
            credential_status: revealed.outcomes,
        }
    }
}

/// Response body for a failed create or update.
///
/// The error is logged by kind only; the body is the generic save message.
pub fn save_error_response(err: &HubError) -> Value {
    warn!(error = err.kind(), "integration save failed");
    json!({ "error": SAVE_FAILURE_MESSAGE })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_error_response_is_generic() {
        let body = save_error_response(&HubError::Encryption("cipher exploded".into()));
        assert_eq!(body, json!({ "error": "Failed to save integration" }));
        assert!(!body.to_string().contains("cipher"));
    }
}
