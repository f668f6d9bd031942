// SPDX-FileCopyrightText: 2026 BusinessHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./businesshub.toml` > `~/.config/businesshub/businesshub.toml`
//! > `/etc/businesshub/businesshub.toml` with environment variable overrides via
//! the `BUSINESSHUB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HubConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/businesshub/businesshub.toml`
/// 3. `~/.config/businesshub/businesshub.toml`
/// 4. `./businesshub.toml`
/// 5. `BUSINESSHUB_*` environment variables
pub fn load_config() -> Result<HubConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HubConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HubConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HubConfig::default()))
        .merge(Toml::file("/etc/businesshub/businesshub.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("businesshub/businesshub.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("businesshub.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `BUSINESSHUB_VAULT_ENCRYPTION_KEY` into
/// `vault.encryption.key`; only the first underscore separates the section.
/// Keys reach the map in their original case.
fn env_provider() -> Env {
    Env::prefixed("BUSINESSHUB_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("server_", "server.", 1)
            .replacen("vault_", "vault.", 1)
            .into()
    })
}
