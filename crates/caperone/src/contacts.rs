// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `caperone contacts` command implementation.

use std::fmt::Write as _;

use caperone_config::CaperoneConfig;
use caperone_core::{CaperoneError, ContactEntry, ContactStore};
use caperone_storage::JsonContactLog;

/// Print the persisted contact log.
pub async fn run_contacts(config: &CaperoneConfig, json: bool) -> Result<(), CaperoneError> {
    let log = JsonContactLog::from_config(&config.storage);
    let entries = log.read_all().await?;

    if json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|e| CaperoneError::Internal(e.to_string()))?;
        println!("{rendered}");
    } else {
        print!("{}", render_summary(&entries));
    }
    Ok(())
}

/// Human-readable listing, oldest first.
fn render_summary(entries: &[ContactEntry]) -> String {
    let mut out = String::new();
    let noun = if entries.len() == 1 { "submission" } else { "submissions" };
    let _ = writeln!(out, "{} contact {noun}", entries.len());

    for entry in entries {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}  {} <{}>",
            entry.received_at.format("%Y-%m-%d %H:%M:%S UTC"),
            entry.name,
            entry.email
        );
        for line in entry.message.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use caperone_core::ContactSubmission;

    use super::*;

    #[test]
    fn summary_lists_entries_in_order() {
        let received = "2026-03-04T05:06:07Z".parse().unwrap();
        let entries = vec![
            ContactEntry::new(
                ContactSubmission {
                    name: "Amina".into(),
                    email: "amina@example.com".into(),
                    message: "Need a quote\nfor two pallets".into(),
                },
                received,
            ),
            ContactEntry::new(
                ContactSubmission {
                    name: "Baraka".into(),
                    email: "baraka@example.com".into(),
                    message: "Call me back".into(),
                },
                received,
            ),
        ];

        let summary = render_summary(&entries);
        assert!(summary.starts_with("2 contact submissions\n"));
        assert!(summary.contains("2026-03-04 05:06:07 UTC  Amina <amina@example.com>"));
        assert!(summary.contains("    for two pallets\n"));
        assert!(summary.find("Amina").unwrap() < summary.find("Baraka").unwrap());
    }

    #[test]
    fn empty_log_has_a_header() {
        assert_eq!(render_summary(&[]), "0 contact submissions\n");
    }
}
