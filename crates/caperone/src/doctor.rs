// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `caperone doctor` command implementation.
//!
//! Runs each adapter's health check plus a few environment checks and prints
//! a pass/warn/fail table.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use colored::Colorize;

use caperone_config::CaperoneConfig;
use caperone_core::{CaperoneError, HealthStatus, PluginAdapter};
use caperone_storage::{DiskAssetStore, JsonContactLog};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl From<&HealthStatus> for CheckStatus {
    fn from(health: &HealthStatus) -> Self {
        match health {
            HealthStatus::Healthy => CheckStatus::Pass,
            HealthStatus::Degraded(_) => CheckStatus::Warn,
            HealthStatus::Unhealthy(_) => CheckStatus::Fail,
        }
    }
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run the `caperone doctor` command.
///
/// Returns an error when any check fails so the exit status is non-zero.
pub async fn run_doctor(config: &CaperoneConfig, plain: bool) -> Result<(), CaperoneError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_public_dir(Path::new(&config.server.public_dir)).await,
        check_adapter(
            "Contact log",
            &JsonContactLog::from_config(&config.storage),
        )
        .await,
        check_adapter(
            "Uploads",
            &DiskAssetStore::new(&config.storage.uploads_dir),
        )
        .await,
        check_notifier(config).await,
    ];

    println!();
    println!("  caperone doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_line(result, use_color));
    }
    println!();

    let fail_count = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    let warn_count = results.iter().filter(|r| r.status == CheckStatus::Warn).count();
    let issues = fail_count + warn_count;
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    if fail_count > 0 {
        return Err(CaperoneError::Internal(format!(
            "{fail_count} check(s) failed"
        )));
    }
    Ok(())
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    let (symbol, message) = if use_color {
        match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.clone()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow().to_string()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red().to_string()),
        }
    } else {
        let marker = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        (marker.to_string(), result.message.clone())
    };
    format!("    {symbol} {:<14} {message} ({duration_ms}ms)", result.name)
}

/// The static site is optional; a missing index only means unknown paths 404.
async fn check_public_dir(dir: &Path) -> CheckResult {
    let start = Instant::now();
    let (status, message) = if !dir.is_dir() {
        (
            CheckStatus::Warn,
            format!("{} not found, only the API will be served", dir.display()),
        )
    } else if !dir.join("index.html").is_file() {
        (
            CheckStatus::Warn,
            format!("{} has no index.html", dir.display()),
        )
    } else {
        (CheckStatus::Pass, dir.display().to_string())
    };
    CheckResult {
        name: "Static site".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_adapter<A: PluginAdapter + ?Sized>(name: &str, adapter: &A) -> CheckResult {
    let start = Instant::now();
    let health = adapter.health_check().await;
    let message = match &health {
        HealthStatus::Healthy => "ok".to_string(),
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => reason.clone(),
    };
    CheckResult {
        name: name.to_string(),
        status: CheckStatus::from(&health),
        message,
        duration: start.elapsed(),
    }
}

/// Probes the relay when SMTP is configured; otherwise notes that
/// notifications are off.
async fn check_notifier(config: &CaperoneConfig) -> CheckResult {
    let start = Instant::now();
    match caperone_email::build_notifier(&config.smtp) {
        Ok(notifier) if !notifier.is_enabled() => CheckResult {
            name: "SMTP".to_string(),
            status: CheckStatus::Warn,
            message: "not configured, contact notifications disabled".to_string(),
            duration: start.elapsed(),
        },
        Ok(notifier) => check_adapter("SMTP", notifier.as_ref()).await,
        Err(e) => CheckResult {
            name: "SMTP".to_string(),
            status: CheckStatus::Fail,
            message: e.to_string(),
            duration: start.elapsed(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_maps_to_check_status() {
        assert_eq!(CheckStatus::from(&HealthStatus::Healthy), CheckStatus::Pass);
        assert_eq!(
            CheckStatus::from(&HealthStatus::Degraded("x".into())),
            CheckStatus::Warn
        );
        assert_eq!(
            CheckStatus::from(&HealthStatus::Unhealthy("x".into())),
            CheckStatus::Fail
        );
    }

    #[test]
    fn plain_lines_use_bracket_markers() {
        let line = format_line(
            &CheckResult {
                name: "Uploads".into(),
                status: CheckStatus::Fail,
                message: "uploads is not writable".into(),
                duration: Duration::from_millis(3),
            },
            false,
        );
        assert!(line.contains("[FAIL]"));
        assert!(line.contains("uploads is not writable"));
        assert!(line.ends_with("(3ms)"));
    }

    #[tokio::test]
    async fn missing_public_dir_warns() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_public_dir(&dir.path().join("nope")).await;
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn public_dir_with_index_passes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        assert_eq!(check_public_dir(dir.path()).await.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn corrupt_contact_log_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, "[{").unwrap();
        let result = check_adapter("Contact log", &JsonContactLog::new(&path)).await;
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn unconfigured_smtp_warns() {
        let result = check_notifier(&CaperoneConfig::default()).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("disabled"));
    }
}
