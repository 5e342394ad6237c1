//! Currency text to [`Decimal`].
//!
//! | Input | Result |
//! |-------|--------|
//! | `"$1,234.50"` | `1234.50` |
//! | `"$0.99"` | `0.99` |
//! | `"1234.50 USD"` | `1234.50` |
//! | `""`, `"N/A"`, `"-5"`, `"1,23.00"` | [`Error::PriceParse`] |

// ============================================================================
// Imports
// ============================================================================

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Unsigned amount with optional `,` thousands groups and decimal part.
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?$").unwrap_or_else(|e| {
        unreachable!("amount pattern is a valid regex: {e}")
    })
});

// ============================================================================
// Public Functions
// ============================================================================

/// Parses a displayed price.
///
/// Whitespace and any currency symbol or code around the amount are
/// dropped. Thousands separators must group exactly three digits.
///
/// # Errors
///
/// Returns [`Error::PriceParse`] for empty, non-numeric, negative or
/// malformed input.
pub fn parse_price(text: &str) -> Result<Decimal> {
    let amount = text
        .trim()
        .trim_matches(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | ',' | '-')));

    if !AMOUNT.is_match(amount) {
        return Err(Error::price_parse(text));
    }

    Decimal::from_str(&amount.replace(',', "")).map_err(|_| Error::price_parse(text))
}

// ============================================================================
// Tests
// ============================================================================
