// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for BusinessHub.
//!
//! Holds the workspace error type and the integration records whose
//! configuration blobs carry third-party credentials.

pub mod error;
pub mod integration;

pub use error::HubError;
pub use integration::{Integration, IntegrationType, IntegrationUpdate, NewIntegration};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_error_kinds_are_stable() {
        assert_eq!(HubError::Config("x".into()).kind(), "configuration");
        assert_eq!(HubError::Format("x".into()).kind(), "format");
        assert_eq!(HubError::Authentication.kind(), "authentication");
        assert_eq!(HubError::Encryption("x".into()).kind(), "encryption");
        assert_eq!(HubError::Internal("x".into()).kind(), "internal");
    }

    #[test]
    fn authentication_error_message_has_no_detail() {
        let msg = HubError::Authentication.to_string();
        assert_eq!(msg, "authentication failed: encrypted value could not be verified");
    }

    #[test]
    fn io_and_json_errors_convert() {
        let io: HubError = std::io::Error::other("boom").into();
        assert_eq!(io.kind(), "io");

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let json: HubError = json_err.into();
        assert_eq!(json.kind(), "json");
    }
}
