// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uploads directory implementation of the [`AssetStore`] port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use caperone_core::{
    AdapterType, AssetStore, HealthStatus, PluginAdapter, UploadError, UploadedAsset,
    UPLOADS_MOUNT,
};

/// Next millisecond values tried when a stored name is already taken.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Longest sanitized original name kept in a stored name, in characters.
const MAX_NAME_CHARS: usize = 120;

/// Stores uploads as `{millis}-{name}` files in one directory.
#[derive(Debug, Clone)]
pub struct DiskAssetStore {
    dir: PathBuf,
}

impl DiskAssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn io_err(&self, path: &Path, source: std::io::Error) -> UploadError {
        UploadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create `path` exclusively and fill it. A partially written file is removed.
    async fn write_new(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;

        if written.is_err() {
            let _ = tokio::fs::remove_file(path).await;
        }
        written
    }
}

#[async_trait]
impl PluginAdapter for DiskAssetStore {
    fn name(&self) -> &str {
        "disk-uploads"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::AssetStore
    }

    /// Healthy when the directory exists and a probe file can be written.
    async fn health_check(&self) -> HealthStatus {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return HealthStatus::Unhealthy(format!("{} is not a directory", self.dir.display())),
            Err(_) => {
                return HealthStatus::Degraded(format!(
                    "{} does not exist yet (created on startup)",
                    self.dir.display()
                ));
            }
        }

        let probe = self.dir.join(".caperone-probe");
        match tokio::fs::write(&probe, b"ok").await {
            Ok(()) => {
                let _ = tokio::fs::remove_file(&probe).await;
                HealthStatus::Healthy
            }
            Err(e) => HealthStatus::Unhealthy(format!("{} is not writable: {e}", self.dir.display())),
        }
    }
}

#[async_trait]
impl AssetStore for DiskAssetStore {
    async fn ensure_ready(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| self.io_err(&self.dir, e))
    }

    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<UploadedAsset, UploadError> {
        self.ensure_ready().await?;

        let safe_name = sanitize_file_name(original_name);
        let first = chrono::Utc::now().timestamp_millis();

        for millis in first..first + MAX_NAME_ATTEMPTS {
            let stored_name = format!("{millis}-{safe_name}");
            let path = self.dir.join(&stored_name);

            match self.write_new(&path, bytes).await {
                Ok(()) => {
                    debug!(stored_name = %stored_name, size = bytes.len(), "upload stored");
                    return Ok(UploadedAsset {
                        original_name: original_name.to_string(),
                        access_path: format!("{UPLOADS_MOUNT}/{stored_name}"),
                        stored_name,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    warn!(stored_name = %stored_name, "upload name collision, trying next timestamp");
                }
                Err(e) => return Err(self.io_err(&path, e)),
            }
        }

        Err(self.io_err(
            &self.dir,
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("no free name for `{safe_name}` after {MAX_NAME_ATTEMPTS} attempts"),
            ),
        ))
    }

    async fn resolve(&self, stored_name: &str) -> Option<PathBuf> {
        if stored_name.is_empty()
            || stored_name.starts_with('.')
            || stored_name.contains(['/', '\\'])
        {
            return None;
        }
        let path = self.dir.join(stored_name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped, characters outside `[A-Za-z0-9._-]` become
/// `_`, leading dots are stripped and the result is capped in length.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    let capped: String = trimmed.chars().take(MAX_NAME_CHARS).collect();

    if capped.is_empty() {
        "file".to_string()
    } else {
        capped
    }
}
