// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipping quote estimation.
//!
//! `estimate = max(50, round(rate * weight * 10))` where the rate is 1.8 for
//! air freight and 0.5 for sea freight, i.e. `18 * weight` and `5 * weight`.
//! Rounding is half away from zero.

use crate::types::{QuoteRequest, QuoteResult, ShippingMode};

/// Currency every estimate is quoted in.
pub const CURRENCY: &str = "KSH";

/// No quote is ever lower than this.
pub const MINIMUM_ESTIMATE: i64 = 50;

const AIR_RATE: f64 = 1.8;
const SEA_RATE: f64 = 0.5;
const WEIGHT_MULTIPLIER: f64 = 10.0;

/// Per-unit rate for a transport mode.
pub fn rate(mode: ShippingMode) -> f64 {
    match mode {
        ShippingMode::Air => AIR_RATE,
        ShippingMode::Sea => SEA_RATE,
    }
}

/// Price estimate for `weight` shipped by `mode`.
///
/// `weight` must already be validated as finite and strictly positive.
pub fn estimate(weight: f64, mode: ShippingMode) -> i64 {
    // rate * 10 is exact (18.0 or 5.0), so only one rounding touches weight.
    let raw = weight * (rate(mode) * WEIGHT_MULTIPLIER);
    // `as` saturates for values beyond i64's range.
    (raw.round() as i64).max(MINIMUM_ESTIMATE)
}

/// Quote a validated request. Origin and destination do not affect the price.
pub fn quote(request: &QuoteRequest) -> QuoteResult {
    QuoteResult {
        estimate: estimate(request.weight, request.mode),
        currency: CURRENCY,
    }
}
