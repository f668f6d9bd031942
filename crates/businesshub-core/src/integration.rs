// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration records as they arrive from and return to the HTTP layer.
//!
//! `config` is an open-ended JSON object. Its `credentials` sub-object is
//! where the vault encrypts secrets before the record is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use uuid::Uuid;

/// Kind of third-party integration a business has configured.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationType {
    ProxyPortal,
    MeshtasticMap,
    ProtonEmail,
    SipPhone,
    CustomIframe,
    ApiIntegration,
    NetworkDrive,
}

/// A persisted integration. `config` holds credentials in encrypted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: Uuid,
    pub business_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type")]
    pub integration_type: IntegrationType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_config")]
    pub config: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an integration. `config` is plaintext here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIntegration {
    pub business_id: Uuid,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type")]
    pub integration_type: IntegrationType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_config")]
    pub config: Value,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Request body for updating an integration. Absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationUpdate {
    #[serde(default)]
    pub name: Option<String>,
    /// `Some(None)` (an explicit `null`) clears the stored description.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn empty_config() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Wraps any present value, `null` included, so it differs from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
