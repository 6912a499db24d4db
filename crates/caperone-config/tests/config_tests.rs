// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Caperone configuration system.

use caperone_config::diagnostic::ConfigError;
use caperone_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_caperone_config() {
    let toml = r#"
[server]
host = "127.0.0.1"
port = 8081
public_dir = "site"
log_level = "debug"

[storage]
contacts_path = "/var/lib/caperone/contacts.json"
uploads_dir = "/var/lib/caperone/uploads"
max_upload_bytes = 2048
recover_corrupt_log = true

[smtp]
host = "smtp.example.com"
port = 465
secure = true
user = "bot@example.com"
pass = "secret"
from = "Caperone <noreply@example.com>"
admin_email = "ops@example.com"
timeout_secs = 5
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.public_dir, "site");
    assert_eq!(config.storage.contacts_path, "/var/lib/caperone/contacts.json");
    assert_eq!(config.storage.max_upload_bytes, 2048);
    assert!(config.storage.recover_corrupt_log);
    assert!(config.smtp.secure);
    assert_eq!(config.smtp.port, 465);
    assert_eq!(config.smtp.timeout_secs, 5);
    assert!(config.smtp.is_configured());
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.public_dir, "public");
    assert!(!config.smtp.is_configured());
}

#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[storage]
upload_dir = "x"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "upload_dir" && suggestion.as_deref() == Some("uploads_dir")
        )
    });
    assert!(found, "expected an UnknownKey error with a suggestion, got {errors:?}");
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[mailer]\nhost = \"x\"\n").unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "got {errors:?}"
    );
}

#[test]
fn semantic_errors_are_collected_together() {
    let toml = r#"
[server]
log_level = "loud"

[storage]
contacts_path = ""

[smtp]
user = "bot@example.com"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 3, "got {errors:?}");
}

#[test]
fn explicit_config_file_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caperone.toml");
    std::fs::write(&path, "[storage]\nmax_upload_bytes = 0\n").unwrap();

    let errors = load_and_validate_path(&path).unwrap_err();
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("max_upload_bytes"))
    ));
}
