// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration credential vault for BusinessHub.
//!
//! Secrets embedded in integration configuration blobs (`password`,
//! `apiSecret`, `accessToken`, `refreshToken` under `config.credentials` by
//! default) are encrypted field by field before persistence and decrypted
//! only for the single-integration detail view.
//!
//! Each secret is sealed with AES-256-GCM under a key derived from the
//! process master key and a per-secret random salt via PBKDF2-HMAC-SHA512,
//! and stored as `saltHex:ivHex:tagHex:ciphertextHex`.

pub mod cipher;
pub mod crypto;
pub mod integration;
pub mod kdf;
pub mod key;
pub mod mapper;

pub use cipher::{CredentialCipher, EncryptedSecret};
pub use integration::{save_error_response, IntegrationVault, RevealedIntegration, SAVE_FAILURE_MESSAGE};
pub use key::MasterKey;
pub use mapper::{audit_fields, CredentialMapper, FieldOutcome, RevealedConfig};
