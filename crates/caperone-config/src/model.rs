// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is a
//! startup error instead of a silently ignored setting.

use serde::{Deserialize, Serialize};

/// Top-level Caperone configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CaperoneConfig {
    /// HTTP listener and static site settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Contact log and uploads locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Mail relay used to notify the administrator of new contacts.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind. `PORT` in the environment overrides it.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static site files served for unmatched GET requests.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Persistence locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file holding the contact log.
    #[serde(default = "default_contacts_path")]
    pub contacts_path: String,

    /// Directory uploaded files are written to and served from.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Move an unreadable contact log aside and start a fresh one instead of
    /// failing every append until someone repairs it.
    #[serde(default)]
    pub recover_corrupt_log: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            contacts_path: default_contacts_path(),
            uploads_dir: default_uploads_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            recover_corrupt_log: false,
        }
    }
}

fn default_contacts_path() -> String {
    "contacts.json".to_string()
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

/// SMTP relay settings. Notifications are enabled only when `host`, `user`
/// and `pass` are all present.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    /// Relay hostname.
    #[serde(default)]
    pub host: Option<String>,

    /// Relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Implicit TLS from the first byte (usually port 465). When false the
    /// connection upgrades with STARTTLS if the relay offers it.
    #[serde(default)]
    pub secure: bool,

    /// Account name used to authenticate.
    #[serde(default)]
    pub user: Option<String>,

    /// Account password.
    #[serde(default)]
    pub pass: Option<String>,

    /// Sender address. Defaults to `user`.
    #[serde(default)]
    pub from: Option<String>,

    /// Recipient of contact notifications. Defaults to `user`.
    #[serde(default)]
    pub admin_email: Option<String>,

    /// Connection and command timeout in seconds.
    #[serde(default = "default_smtp_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            secure: false,
            user: None,
            pass: None,
            from: None,
            admin_email: None,
            timeout_secs: default_smtp_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "[redacted]"))
            .field("from", &self.from)
            .field("admin_email", &self.admin_email)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout_secs() -> u64 {
    10
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SmtpConfig {
    /// Whether every field needed to reach the relay is set.
    pub fn is_configured(&self) -> bool {
        present(&self.host).is_some() && present(&self.user).is_some() && present(&self.pass).is_some()
    }

    /// Whether any part of the relay group is set.
    pub fn is_partially_configured(&self) -> bool {
        present(&self.host).is_some() || present(&self.user).is_some() || present(&self.pass).is_some()
    }

    /// Sender address: `from`, else the account itself.
    pub fn sender(&self) -> Option<&str> {
        present(&self.from).or_else(|| present(&self.user))
    }

    /// Notification recipient: `admin_email`, else the account itself.
    pub fn recipient(&self) -> Option<&str> {
        present(&self.admin_email).or_else(|| present(&self.user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp() -> SmtpConfig {
        SmtpConfig {
            host: Some("smtp.example.com".into()),
            user: Some("bot@example.com".into()),
            pass: Some("hunter2".into()),
            ..SmtpConfig::default()
        }
    }

    #[test]
    fn defaults_match_legacy_deployment() {
        let config = CaperoneConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.contacts_path, "contacts.json");
        assert_eq!(config.storage.uploads_dir, "uploads");
        assert!(!config.smtp.is_configured());
    }

    #[test]
    fn smtp_requires_host_user_and_pass() {
        assert!(smtp().is_configured());
        let mut missing_pass = smtp();
        missing_pass.pass = Some("  ".into());
        assert!(!missing_pass.is_configured());
        assert!(missing_pass.is_partially_configured());
    }

    #[test]
    fn sender_and_recipient_fall_back_to_user() {
        let mut config = smtp();
        assert_eq!(config.sender(), Some("bot@example.com"));
        assert_eq!(config.recipient(), Some("bot@example.com"));

        config.from = Some("Caperone <noreply@example.com>".into());
        config.admin_email = Some("ops@example.com".into());
        assert_eq!(config.sender(), Some("Caperone <noreply@example.com>"));
        assert_eq!(config.recipient(), Some("ops@example.com"));
    }

    #[test]
    fn smtp_debug_redacts_password() {
        let debug = format!("{:?}", smtp());
        assert!(debug.contains("[redacted]"));
        assert!(!debug.contains("hunter2"));
    }
}
