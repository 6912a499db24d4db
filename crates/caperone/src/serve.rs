// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `caperone serve` command implementation.
//!
//! Builds the stores and the notifier from configuration, prepares the
//! uploads directory and runs the HTTP server until SIGINT or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use caperone_config::CaperoneConfig;
use caperone_core::{AssetStore, CaperoneError, HealthStatus, PluginAdapter};
use caperone_gateway::{AppState, ServerConfig};
use caperone_storage::{DiskAssetStore, JsonContactLog};

use crate::shutdown;

/// Run the `caperone serve` command.
pub async fn run_serve(config: CaperoneConfig) -> Result<(), CaperoneError> {
    init_tracing(&config.server.log_level);

    let contacts = JsonContactLog::from_config(&config.storage);
    match contacts.health_check().await {
        HealthStatus::Healthy => {}
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => {
            warn!(path = %contacts.path().display(), %reason, "contact log needs attention");
        }
    }

    // A missing uploads directory that cannot be created is fatal.
    let assets = DiskAssetStore::new(&config.storage.uploads_dir);
    assets.ensure_ready().await?;

    let notifier = caperone_email::build_notifier(&config.smtp)?;

    let state = AppState {
        contacts: Arc::new(contacts),
        assets: Arc::new(assets),
        notifier,
    };

    let server_config = gateway_config(&config);
    info!(
        public_dir = %server_config.public_dir.display(),
        uploads_dir = %config.storage.uploads_dir,
        contacts_path = %config.storage.contacts_path,
        "starting caperone"
    );

    let shutdown = shutdown::install_signal_handler();
    caperone_gateway::start_server(&server_config, state, shutdown).await
}

/// Map the loaded configuration onto the gateway's own settings.
fn gateway_config(config: &CaperoneConfig) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        public_dir: PathBuf::from(&config.server.public_dir),
        max_body_bytes: config.storage.max_upload_bytes,
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "caperone={log_level},caperone_gateway={log_level},caperone_storage={log_level},\
             caperone_email={log_level},tower_http=info,warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
