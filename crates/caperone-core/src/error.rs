// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Caperone.
//!
//! Client-input problems are reported by the gateway itself. Storage and
//! notification errors are logged and absorbed there.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading or writing the contact log.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The log file could not be read, written or replaced.
    #[error("contact log I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file exists but does not hold a JSON array of contact entries.
    #[error("contact log at {path} is malformed: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The updated log could not be serialized.
    #[error("failed to serialize contact log: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Failure while storing an uploaded file.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The uploads directory could not be created or the file not written.
    #[error("upload I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while dispatching a contact notification email.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A sender or recipient address did not parse.
    #[error("invalid mail address `{address}`: {message}")]
    Address { address: String, message: String },

    /// The message could not be assembled.
    #[error("failed to build notification message: {0}")]
    Build(String),

    /// Transport, authentication or timeout failure talking to the relay.
    #[error("mail transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// The primary error type used across Caperone's crates.
#[derive(Debug, Error)]
pub enum CaperoneError {
    /// Contact log errors.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Upload storage errors.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Notification errors.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
