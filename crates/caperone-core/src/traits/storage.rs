// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage ports: the contact log and the uploads directory.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{StoreError, UploadError};
use crate::traits::adapter::PluginAdapter;
use crate::types::{ContactEntry, UploadedAsset};

/// Append-only, ordered log of contact submissions.
///
/// Implementations must serialize concurrent `append` calls so that no
/// entry is lost to an interleaved read-modify-write.
#[async_trait]
pub trait ContactStore: PluginAdapter {
    /// Append one entry at the tail of the log.
    async fn append(&self, entry: ContactEntry) -> Result<(), StoreError>;

    /// Read the whole log in submission order. A missing log is empty.
    async fn read_all(&self) -> Result<Vec<ContactEntry>, StoreError>;
}

/// Durable storage for uploaded files.
#[async_trait]
pub trait AssetStore: PluginAdapter {
    /// Create the backing location if absent. Idempotent; never removes files.
    async fn ensure_ready(&self) -> Result<(), UploadError>;

    /// Persist `bytes` under a collision-resistant name derived from
    /// `original_name` and return where it can be fetched.
    async fn store(&self, bytes: &[u8], original_name: &str)
        -> Result<UploadedAsset, UploadError>;

    /// Map a stored name back to its location, if such a file exists.
    async fn resolve(&self, stored_name: &str) -> Option<PathBuf>;
}
