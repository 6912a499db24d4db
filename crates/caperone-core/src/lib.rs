// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Caperone.
//!
//! Holds the pieces with no I/O of their own: payload validation, the quote
//! estimator, the shared data types and error enums, and the port traits
//! that the storage and email crates implement.

pub mod error;
pub mod quote;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export key items at crate root for ergonomic imports.
pub use error::{CaperoneError, NotifyError, StoreError, UploadError};
pub use types::{
    AdapterType, ContactEntry, ContactSubmission, HealthStatus, QuoteRequest, QuoteResult,
    ShippingMode, UploadedAsset, UPLOADS_MOUNT,
};

pub use traits::{AssetStore, ContactStore, Notifier, PluginAdapter};
