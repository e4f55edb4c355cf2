//! Text parsing helpers for domain values.
//!
//! The storefront renders prices as locale-formatted strings
//! (`"Rs. 1,000"`); tests compare them as plain integers in minor-unit-free
//! currency.

use crate::result::{ComprarError, ComprarResult};
use regex::Regex;
use std::sync::OnceLock;

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9]").unwrap())
}

fn canonical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
}

/// Parse a rendered price like `"Rs. 1,000"` into `1000`.
///
/// Strips everything except digits; errors when no digit remains.
pub fn parse_price(text: &str) -> ComprarResult<i64> {
    let digits = digits_re().replace_all(text, "");
    if digits.is_empty() {
        return Err(ComprarError::FieldAbsent {
            field: format!("price in {text:?}"),
        });
    }
    digits.parse().map_err(|_| ComprarError::FieldAbsent {
        field: format!("price in {text:?}"),
    })
}

/// Parse a rendered integer like a cart quantity cell
pub fn parse_quantity(text: &str) -> ComprarResult<i64> {
    let trimmed = text.trim();
    trimmed.parse().map_err(|_| ComprarError::FieldAbsent {
        field: format!("quantity in {text:?}"),
    })
}

/// True when the input is a canonical positive integer: ASCII digits only,
/// no sign, no decimal point, no surrounding whitespace.
#[must_use]
pub fn is_canonical_quantity(text: &str) -> bool {
    canonical_re().is_match(text)
}

/// Collapse runs of whitespace for name comparison
#[must_use]
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
