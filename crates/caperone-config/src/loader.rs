// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./caperone.toml` > `~/.config/caperone/caperone.toml`
//! > `/etc/caperone/caperone.toml`, then `CAPERONE_*` environment variables,
//! then the bare deployment variables (`PORT`, `SMTP_*`, `ADMIN_EMAIL`).

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CaperoneConfig;

/// Bare environment variables understood for compatibility with existing
/// deployments, and the config keys they set.
pub const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("SMTP_HOST", "smtp.host"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_SECURE", "smtp.secure"),
    ("SMTP_USER", "smtp.user"),
    ("SMTP_PASS", "smtp.pass"),
    ("SMTP_FROM", "smtp.from"),
    ("ADMIN_EMAIL", "smtp.admin_email"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/caperone/caperone.toml` (system-wide)
/// 3. `~/.config/caperone/caperone.toml` (user XDG config)
/// 4. `./caperone.toml` (local directory)
/// 5. `CAPERONE_*` environment variables
/// 6. `PORT`, `SMTP_*`, `ADMIN_EMAIL`
pub fn load_config() -> Result<CaperoneConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CaperoneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CaperoneConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CaperoneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CaperoneConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(legacy_env_provider())
        .extract()
}

/// Build the Figment used for the XDG lookup, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CaperoneConfig::default()))
        .merge(Toml::file("/etc/caperone/caperone.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("caperone/caperone.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("caperone.toml"))
        .merge(env_provider())
        .merge(legacy_env_provider())
}

/// `CAPERONE_<SECTION>_<KEY>` variables.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `CAPERONE_STORAGE_UPLOADS_DIR` must map to
/// `storage.uploads_dir`, not `storage.uploads.dir`.
fn env_provider() -> Env {
    Env::prefixed("CAPERONE_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("smtp_", "smtp.", 1)
            .into()
    })
}

/// The bare variables listed in [`LEGACY_ENV_KEYS`].
fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| path.to_string())
            .unwrap_or_else(|| key.as_str().to_ascii_lowercase())
            .into()
    })
}
