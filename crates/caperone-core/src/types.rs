// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the validator, stores, notifier and gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a port.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    ContactStore,
    AssetStore,
    Notifier,
}

/// A contact form submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// One persisted contact-form submission.
///
/// `receivedAt` is assigned by the server. Logs written by older deployments
/// stored it under `date`, which is still accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEntry {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(alias = "date")]
    pub received_at: DateTime<Utc>,
}

impl ContactEntry {
    /// Stamp a validated submission with the time it was received.
    pub fn new(submission: ContactSubmission, received_at: DateTime<Utc>) -> Self {
        Self {
            name: submission.name,
            email: submission.email,
            message: submission.message,
            received_at,
        }
    }
}

/// URL prefix uploaded files are served under.
pub const UPLOADS_MOUNT: &str = "/uploads";

/// A file accepted by the upload handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    /// File name as sent by the client.
    pub original_name: String,
    /// `{millis}-{sanitized original name}` on disk; may differ from `original_name`.
    pub stored_name: String,
    /// Public path the file is served from, e.g. `/uploads/1700000000000-a.jpg`.
    pub access_path: String,
}

/// Freight transport mode for a quote.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShippingMode {
    Sea,
    Air,
}

/// A validated quote request. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub origin: String,
    pub destination: String,
    /// Strictly positive, finite.
    pub weight: f64,
    pub mode: ShippingMode,
}

/// A computed price estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteResult {
    pub estimate: i64,
    pub currency: &'static str,
}
