// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural validation of contact and quote payloads.
//!
//! Every rule for a payload is evaluated; the caller gets either the
//! normalized typed record or every violation found, in field order.
//! Text fields are trimmed before they are checked and stored.

use std::str::FromStr;

use email_address::EmailAddress;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{ContactSubmission, QuoteRequest, ShippingMode};

/// Minimum number of characters in a contact message.
pub const MIN_MESSAGE_LEN: usize = 5;

/// A raw JSON object as received from a client.
pub type Payload = Map<String, Value>;

/// One field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a contact form payload (`name`, `email`, `message`).
pub fn validate_contact(payload: &Payload) -> Result<ContactSubmission, Vec<Violation>> {
    let mut check = FieldCheck::new(payload);
    let name = check.non_empty("name", "Name is required");
    let email = check.email("email");
    let message = check.min_chars("message", MIN_MESSAGE_LEN);

    check.finish(|| {
        Some(ContactSubmission {
            name: name?,
            email: email?,
            message: message?,
        })
    })
}

/// Validate a quote payload (`origin`, `destination`, `weight`, `mode`).
pub fn validate_quote(payload: &Payload) -> Result<QuoteRequest, Vec<Violation>> {
    let mut check = FieldCheck::new(payload);
    let origin = check.non_empty("origin", "Origin is required");
    let destination = check.non_empty("destination", "Destination is required");
    let weight = check.positive_float("weight");
    let mode = check.one_of::<ShippingMode>("mode", &["sea", "air"]);

    check.finish(|| {
        Some(QuoteRequest {
            origin: origin?,
            destination: destination?,
            weight: weight?,
            mode: mode?,
        })
    })
}

/// Collects violations while extracting typed values field by field.
struct FieldCheck<'a> {
    payload: &'a Payload,
    violations: Vec<Violation>,
}

impl<'a> FieldCheck<'a> {
    fn new(payload: &'a Payload) -> Self {
        Self {
            payload,
            violations: Vec::new(),
        }
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(field, message));
    }

    /// Trimmed string value, or a violation if absent or not a string.
    fn text(&mut self, field: &str, missing: &str) -> Option<String> {
        match self.payload.get(field) {
            Some(Value::String(s)) => Some(s.trim().to_string()),
            None | Some(Value::Null) => {
                self.reject(field, missing);
                None
            }
            Some(_) => {
                self.reject(field, format!("{field} must be a string"));
                None
            }
        }
    }

    fn non_empty(&mut self, field: &str, missing: &str) -> Option<String> {
        let value = self.text(field, missing)?;
        if value.is_empty() {
            self.reject(field, missing);
            return None;
        }
        Some(value)
    }

    fn email(&mut self, field: &str) -> Option<String> {
        const INVALID: &str = "Must be a valid email address";
        let value = self.text(field, INVALID)?;
        if is_valid_email(&value) {
            Some(value)
        } else {
            self.reject(field, INVALID);
            None
        }
    }

    fn min_chars(&mut self, field: &str, min: usize) -> Option<String> {
        let too_short = format!("Message must be at least {min} characters");
        let value = self.text(field, &too_short)?;
        if value.chars().count() < min {
            self.reject(field, too_short);
            return None;
        }
        Some(value)
    }

    fn positive_float(&mut self, field: &str) -> Option<f64> {
        const INVALID: &str = "Weight must be a number greater than 0";
        let parsed = match self.payload.get(field) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(w) if w.is_finite() && w > 0.0 => Some(w),
            _ => {
                self.reject(field, INVALID);
                None
            }
        }
    }

    fn one_of<T: FromStr>(&mut self, field: &str, allowed: &[&str]) -> Option<T> {
        let parsed = match self.payload.get(field) {
            Some(Value::String(s)) if allowed.contains(&s.as_str()) => s.parse::<T>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.reject(field, format!("Mode must be one of: {}", allowed.join(", ")));
        }
        parsed
    }

    /// `build` only runs when no violation was recorded.
    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, Vec<Violation>> {
        if !self.violations.is_empty() {
            return Err(self.violations);
        }
        build().ok_or_else(|| vec![Violation::new("payload", "Invalid request payload")])
    }
}

/// `local@domain` with a dotted domain and no whitespace anywhere.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    match EmailAddress::from_str(candidate) {
        Ok(address) => {
            let domain = address.domain();
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        Err(_) => false,
    }
}
