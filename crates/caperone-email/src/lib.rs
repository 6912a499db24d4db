// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact notifications for Caperone.
//!
//! [`build_notifier`] runs once at startup and returns either an
//! [`SmtpNotifier`] (when `[smtp]` is fully configured) or a [`NullNotifier`].
//! Request handlers never branch on configuration themselves.

pub mod null;
pub mod smtp;

use std::sync::Arc;

use tracing::info;

use caperone_config::model::SmtpConfig;
use caperone_core::{Notifier, NotifyError};

pub use null::NullNotifier;
pub use smtp::SmtpNotifier;

/// Choose the notifier implementation for this process.
pub fn build_notifier(config: &SmtpConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    if !config.is_configured() {
        info!("smtp not configured; contact notifications disabled");
        return Ok(Arc::new(NullNotifier));
    }

    let notifier = SmtpNotifier::from_config(config)?;
    info!(
        host = config.host.as_deref().unwrap_or_default(),
        port = config.port,
        secure = config.secure,
        "contact notifications enabled"
    );
    Ok(Arc::new(notifier))
}

#[cfg(test)]
mod tests {
    use caperone_core::{ContactEntry, PluginAdapter};

    use super::*;

    #[tokio::test]
    async fn unconfigured_smtp_yields_null_notifier() {
        let notifier = build_notifier(&SmtpConfig::default()).unwrap();
        assert!(!notifier.is_enabled());
        assert_eq!(notifier.name(), "null-notifier");

        let entry = ContactEntry {
            name: "a".into(),
            email: "a@b.co".into(),
            message: "hello".into(),
            received_at: chrono::Utc::now(),
        };
        assert!(notifier.notify(&entry).await.is_ok());
    }

    #[test]
    fn configured_smtp_yields_real_sender() {
        let config = SmtpConfig {
            host: Some("smtp.example.com".into()),
            user: Some("bot@example.com".into()),
            pass: Some("pw".into()),
            ..SmtpConfig::default()
        };
        let notifier = build_notifier(&config).unwrap();
        assert!(notifier.is_enabled());
        assert_eq!(notifier.name(), "smtp");
    }
}
