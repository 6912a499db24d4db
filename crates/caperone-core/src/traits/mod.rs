// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port traits for the side-effecting components.
//!
//! All ports extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so the gateway can hold them as trait objects.

pub mod adapter;
pub mod notifier;
pub mod storage;

pub use adapter::PluginAdapter;
pub use notifier::Notifier;
pub use storage::{AssetStore, ContactStore};
