// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-file implementation of the [`ContactStore`] port.
//!
//! The whole log is one pretty-printed JSON array. Every append reads it,
//! pushes the new entry and writes it back. That read-modify-write cycle runs
//! under `write_lock`, so the store is the single writer of its file; the
//! new contents go to a sibling temp file which is then renamed over the log,
//! so readers never observe a half-written array.
//!
//! **Do NOT point two `JsonContactLog` instances at the same path.**

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use caperone_config::model::StorageConfig;
use caperone_core::{
    AdapterType, ContactEntry, ContactStore, HealthStatus, PluginAdapter, StoreError,
};

/// Append-only contact log persisted as a JSON array.
pub struct JsonContactLog {
    path: PathBuf,
    recover_corrupt: bool,
    write_lock: Mutex<()>,
}

impl JsonContactLog {
    /// Create a log backed by `path`. Nothing is touched until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recover_corrupt: false,
            write_lock: Mutex::new(()),
        }
    }

    /// Build from `[storage]` settings.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.contacts_path).with_corrupt_recovery(config.recover_corrupt_log)
    }

    /// When enabled, an unparseable log is renamed to
    /// `<name>.corrupt-<millis>` and a fresh log is started.
    pub fn with_corrupt_recovery(mut self, enabled: bool) -> Self {
        self.recover_corrupt = enabled;
        self
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<ContactEntry>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn persist(&self, entries: &[ContactEntry]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let body = serde_json::to_vec_pretty(entries).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let tmp = self.sibling("tmp");
        tokio::fs::write(&tmp, &body).await.map_err(io_err)?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(e));
        }
        Ok(())
    }

    async fn quarantine(&self) -> Result<PathBuf, StoreError> {
        let target = self.sibling(&format!(
            "corrupt-{}",
            chrono::Utc::now().timestamp_millis()
        ));
        tokio::fs::rename(&self.path, &target)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(target)
    }

    /// `contacts.json` -> `contacts.json.<suffix>` in the same directory.
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "contacts.json".into());
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PluginAdapter for JsonContactLog {
    fn name(&self) -> &str {
        "json-contact-log"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ContactStore
    }

    async fn health_check(&self) -> HealthStatus {
        match self.load().await {
            Ok(entries) => {
                debug!(entries = entries.len(), path = %self.path.display(), "contact log readable");
                HealthStatus::Healthy
            }
            Err(e @ StoreError::Corrupt { .. }) if self.recover_corrupt => {
                HealthStatus::Degraded(format!("{e} (will be quarantined on next append)"))
            }
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

#[async_trait]
impl ContactStore for JsonContactLog {
    async fn append(&self, entry: ContactEntry) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { source, .. }) if self.recover_corrupt => {
                let moved_to = self.quarantine().await?;
                warn!(
                    error = %source,
                    moved_to = %moved_to.display(),
                    "contact log was malformed; moved aside and starting a new log"
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        entries.push(entry);
        self.persist(&entries).await?;
        debug!(entries = entries.len(), "contact appended");
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<ContactEntry>, StoreError> {
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_keeps_directory() {
        let log = JsonContactLog::new("/srv/data/contacts.json");
        assert_eq!(log.sibling("tmp"), PathBuf::from("/srv/data/contacts.json.tmp"));
    }

    #[tokio::test]
    async fn whitespace_only_file_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, "  \n").unwrap();
        let log = JsonContactLog::new(&path);
        assert!(log.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reflects_file_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        let log = JsonContactLog::new(&path);
        assert_eq!(log.health_check().await, HealthStatus::Healthy);

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(log.health_check().await, HealthStatus::Unhealthy(_)));

        let log = JsonContactLog::new(&path).with_corrupt_recovery(true);
        assert!(matches!(log.health_check().await, HealthStatus::Degraded(_)));
    }
}
