// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier that captures notifications instead of sending mail.
//!
//! The gateway dispatches notifications on a background task, so tests
//! should use [`MockNotifier::wait_for`] rather than reading the captured
//! list straight after the HTTP response.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use caperone_core::{AdapterType, ContactEntry, HealthStatus, Notifier, NotifyError, PluginAdapter};

/// Notifier that captures every contact entry instead of sending mail.
pub struct MockNotifier {
    sent: Mutex<Vec<ContactEntry>>,
    attempts: Mutex<usize>,
    notify: Notify,
    fail: bool,
}

impl MockNotifier {
    /// Create a notifier that records every entry and succeeds.
    pub fn new() -> Self {
        Self::with_failure(false)
    }

    /// Create a notifier that counts attempts and fails every one of them.
    pub fn failing() -> Self {
        Self::with_failure(true)
    }

    fn with_failure(fail: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
            notify: Notify::new(),
            fail,
        }
    }

    /// Entries successfully "sent" so far.
    pub async fn sent(&self) -> Vec<ContactEntry> {
        self.sent.lock().await.clone()
    }

    /// Number of `notify` calls, successful or not.
    pub async fn attempts(&self) -> usize {
        *self.attempts.lock().await
    }

    /// Wait until at least `count` notify calls have been made.
    ///
    /// Returns `false` if `timeout` elapses first.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.notify.notified();
                if self.attempts().await >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
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
impl Notifier for MockNotifier {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn notify(&self, entry: &ContactEntry) -> Result<(), NotifyError> {
        let result = if self.fail {
            Err(NotifyError::Transport {
                message: "simulated relay outage".into(),
                source: None,
            })
        } else {
            self.sent.lock().await.push(entry.clone());
            Ok(())
        };
        *self.attempts.lock().await += 1;
        self.notify.notify_waiters();
        result
    }
}
