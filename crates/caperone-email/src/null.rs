// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier installed when no SMTP relay is configured.

use async_trait::async_trait;

use caperone_core::{AdapterType, ContactEntry, HealthStatus, Notifier, NotifyError, PluginAdapter};

/// Does nothing and always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

#[async_trait]
impl PluginAdapter for NullNotifier {
    fn name(&self) -> &str {
        "null-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

#[async_trait]
impl Notifier for NullNotifier {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn notify(&self, _entry: &ContactEntry) -> Result<(), NotifyError> {
        Ok(())
    }
}
