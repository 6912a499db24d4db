// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem persistence for Caperone.
//!
//! - [`JsonContactLog`] implements `ContactStore` over one JSON array file.
//! - [`DiskAssetStore`] implements `AssetStore` over the uploads directory.

pub mod contact_log;
pub mod uploads;

pub use contact_log::JsonContactLog;
pub use uploads::{sanitize_file_name, DiskAssetStore};
