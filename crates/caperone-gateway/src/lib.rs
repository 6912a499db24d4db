// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Caperone.
//!
//! Exposes the JSON API (health, contact, quote, upload), serves stored
//! uploads and falls back to the static site for everything else.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{bind, build_router, serve, start_server, AppState, ServerConfig};
