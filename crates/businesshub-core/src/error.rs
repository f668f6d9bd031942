// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for BusinessHub.

use thiserror::Error;

/// The primary error type used across the BusinessHub crates.
#[derive(Debug, Error)]
pub enum HubError {
    /// Master key missing or malformed, or an invalid configuration value.
    /// Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A stored value does not have the shape of an encrypted secret record.
    #[error("format error: {0}")]
    Format(String),

    /// AEAD tag verification failed: tampered data, wrong master key, or
    /// corruption. Deliberately carries no detail.
    #[error("authentication failed: encrypted value could not be verified")]
    Authentication,

    /// The cipher, KDF, or random source failed while encrypting.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure (reading input files, stdin).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Short, stable name of the error kind, safe to log or return to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Format(_) => "format",
            Self::Authentication => "authentication",
            Self::Encryption(_) => "encryption",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }
}
