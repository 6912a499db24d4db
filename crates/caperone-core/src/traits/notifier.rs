// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification port for contact submissions.

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ContactEntry;

/// Best-effort side channel that tells an administrator about a submission.
///
/// The concrete sender is chosen once at startup. When notifications are
/// configured off, a null sender is installed whose `notify` always succeeds.
#[async_trait]
pub trait Notifier: PluginAdapter {
    /// Whether this notifier actually delivers anything.
    fn is_enabled(&self) -> bool;

    /// Dispatch one notification for `entry`.
    async fn notify(&self, entry: &ContactEntry) -> Result<(), NotifyError>;
}
