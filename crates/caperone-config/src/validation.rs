// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths and a complete SMTP group.

use caperone_core::validate::is_valid_email;

use crate::diagnostic::ConfigError;
use crate::model::CaperoneConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CaperoneConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        fail(format!(
            "server.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.server.log_level
        ));
    }

    if config.storage.contacts_path.trim().is_empty() {
        fail("storage.contacts_path must not be empty".to_string());
    }

    if config.storage.uploads_dir.trim().is_empty() {
        fail("storage.uploads_dir must not be empty".to_string());
    }

    if config.storage.max_upload_bytes == 0 {
        fail("storage.max_upload_bytes must be greater than 0".to_string());
    }

    let smtp = &config.smtp;
    if smtp.is_partially_configured() && !smtp.is_configured() {
        fail("smtp.host, smtp.user and smtp.pass must be set together".to_string());
    }

    if smtp.is_configured() {
        if smtp.port == 0 {
            fail("smtp.port must not be 0".to_string());
        }
        if smtp.timeout_secs == 0 {
            fail("smtp.timeout_secs must be greater than 0".to_string());
        }
        if let Some(sender) = smtp.sender()
            && !is_valid_email(mailbox_address(sender))
        {
            fail(format!("smtp sender `{sender}` is not a valid email address"));
        }
        if let Some(recipient) = smtp.recipient()
            && !is_valid_email(mailbox_address(recipient))
        {
            fail(format!(
                "smtp recipient `{recipient}` is not a valid email address"
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The bare address of `Display Name <addr@host>`, or the input unchanged.
pub fn mailbox_address(mailbox: &str) -> &str {
    match (mailbox.rfind('<'), mailbox.rfind('>')) {
        (Some(open), Some(close)) if open < close => mailbox[open + 1..close].trim(),
        _ => mailbox.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CaperoneConfig::default()).is_ok());
    }

    #[test]
    fn empty_paths_fail_validation() {
        let mut config = CaperoneConfig::default();
        config.storage.contacts_path = " ".to_string();
        config.storage.uploads_dir = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "contacts_path"));
        assert!(has_error(&errors, "uploads_dir"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = CaperoneConfig::default();
        config.server.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "server.log_level"));
    }

    #[test]
    fn partial_smtp_group_fails_validation() {
        let mut config = CaperoneConfig::default();
        config.smtp.host = Some("smtp.example.com".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "must be set together"));
    }

    #[test]
    fn bad_admin_email_fails_validation() {
        let mut config = CaperoneConfig::default();
        config.smtp.host = Some("smtp.example.com".to_string());
        config.smtp.user = Some("bot@example.com".to_string());
        config.smtp.pass = Some("pw".to_string());
        config.smtp.admin_email = Some("ops-at-example".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "recipient"));
    }

    #[test]
    fn display_name_sender_passes() {
        let mut config = CaperoneConfig::default();
        config.smtp.host = Some("smtp.example.com".to_string());
        config.smtp.user = Some("bot".to_string());
        config.smtp.pass = Some("pw".to_string());
        config.smtp.from = Some("Caperone <noreply@caperone.co.ke>".to_string());
        config.smtp.admin_email = Some("ops@caperone.co.ke".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn mailbox_address_extracts_angle_brackets() {
        assert_eq!(mailbox_address("Ops <ops@x.io>"), "ops@x.io");
        assert_eq!(mailbox_address(" ops@x.io "), "ops@x.io");
    }
}
