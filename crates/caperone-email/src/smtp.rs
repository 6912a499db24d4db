// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP notifier built on lettre's async transport.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use caperone_config::model::SmtpConfig;
use caperone_core::{AdapterType, ContactEntry, HealthStatus, Notifier, NotifyError, PluginAdapter};

/// Sends one plain-text email per contact submission to the administrator.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    from: Mailbox,
    to: Mailbox,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("host", &self.host)
            .field("from", &self.from.to_string())
            .field("to", &self.to.to_string())
            .finish()
    }
}

impl SmtpNotifier {
    /// Build a notifier from a fully configured `[smtp]` section.
    ///
    /// No connection is made here; the relay is contacted per notification.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let (Some(host), Some(user), Some(pass)) = (
            config.host.as_deref(),
            config.user.as_deref(),
            config.pass.as_deref(),
        ) else {
            return Err(NotifyError::Build(
                "smtp.host, smtp.user and smtp.pass are required".to_string(),
            ));
        };
        let host = host.trim();

        let from = parse_mailbox(config.sender().unwrap_or(user))?;
        let to = parse_mailbox(config.recipient().unwrap_or(user))?;

        let tls_parameters = TlsParameters::new(host.to_string()).map_err(|e| {
            NotifyError::Build(format!("invalid TLS parameters for {host}: {e}"))
        })?;
        let tls = if config.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(config.port)
            .tls(tls)
            .credentials(Credentials::new(user.trim().to_string(), pass.to_string()))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self {
            transport,
            host: host.to_string(),
            from,
            to,
        })
    }

    /// Assemble the notification for `entry`. Replies go to the submitter
    /// when their address is usable as a mailbox.
    pub fn build_message(&self, entry: &ContactEntry) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!("New contact from {}", entry.name))
            .header(ContentType::TEXT_PLAIN);

        if let Ok(address) = entry.email.parse::<Address>() {
            builder = builder.reply_to(Mailbox::new(Some(entry.name.clone()), address));
        }

        builder
            .body(entry.message.clone())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, NotifyError> {
    raw.trim().parse::<Mailbox>().map_err(|e| NotifyError::Address {
        address: raw.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl PluginAdapter for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    /// Opens a session to the relay and closes it again.
    async fn health_check(&self) -> HealthStatus {
        match self.transport.test_connection().await {
            Ok(true) => HealthStatus::Healthy,
            Ok(false) => HealthStatus::Unhealthy(format!("{} refused the connection", self.host)),
            Err(e) => HealthStatus::Unhealthy(format!("{}: {e}", self.host)),
        }
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn notify(&self, entry: &ContactEntry) -> Result<(), NotifyError> {
        let message = self.build_message(entry)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport {
                message: format!("sending via {} failed: {e}", self.host),
                source: Some(Box::new(e)),
            })?;
        debug!(code = %response.code(), "contact notification accepted by relay");
        Ok(())
    }
}
