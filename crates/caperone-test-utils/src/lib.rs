// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Caperone integration tests.
//!
//! Provides mock adapters and a harness that drives the real router
//! in-process, without binding a port or talking to an SMTP relay.
//!
//! # Components
//!
//! - [`TestHarness`] - Router over a temporary directory with request helpers
//! - [`MockContactStore`] - In-memory contact store, optionally failing
//! - [`MockNotifier`] - Captures notifications, optionally failing

pub mod harness;
pub mod mock_notifier;
pub mod mock_store;

pub use harness::{multipart_body, Part, TestHarness, TestResponse};
pub use mock_notifier::MockNotifier;
pub use mock_store::MockContactStore;
