// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory contact store for deterministic testing.

use async_trait::async_trait;
use tokio::sync::Mutex;

use caperone_core::{AdapterType, ContactEntry, ContactStore, HealthStatus, PluginAdapter, StoreError};

/// Keeps contact entries in a vector. Can be switched to fail every append.
pub struct MockContactStore {
    entries: Mutex<Vec<ContactEntry>>,
    fail_appends: bool,
}

impl MockContactStore {
    /// Create an empty store that accepts every append.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail_appends: false,
        }
    }

    /// Create a store whose appends always fail, as a disk-full log would.
    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail_appends: true,
        }
    }

    /// Snapshot of everything appended so far, in order.
    pub async fn entries(&self) -> Vec<ContactEntry> {
        self.entries.lock().await.clone()
    }
}

impl Default for MockContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockContactStore {
    fn name(&self) -> &str {
        "mock-contact-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ContactStore
    }

    async fn health_check(&self) -> HealthStatus {
        if self.fail_appends {
            HealthStatus::Unhealthy("configured to fail".into())
        } else {
            HealthStatus::Healthy
        }
    }
}

#[async_trait]
impl ContactStore for MockContactStore {
    async fn append(&self, entry: ContactEntry) -> Result<(), StoreError> {
        if self.fail_appends {
            return Err(StoreError::Io {
                path: "mock://contacts.json".into(),
                source: std::io::Error::other("simulated write failure"),
            });
        }
        self.entries.lock().await.push(entry);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<ContactEntry>, StoreError> {
        Ok(self.entries().await)
    }
}
