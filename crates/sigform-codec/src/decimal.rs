#![forbid(unsafe_code)]

//! Fixed-point decimal codec.
//!
//! Converts between human-entered decimal strings and scaled integers: a
//! value `v` with scale `s` represents the decimal `v / 10^s`. Token amounts
//! typically use `s = 18`.
//!
//! # Invariants
//!
//! 1. **Lossless round trip**: for every `v` and `s`,
//!    `parse_decimal(&format_decimal(&v, s, None), s) == Ok(v)`.
//!
//! 2. **Truncation, never rounding**: excess fractional digits are cut off
//!    both when parsing (`"1.129"` at scale 2 is `112`) and when formatting
//!    with `max_decimals`. Monetary displays rely on this; never switch to
//!    rounding.
//!
//! 3. **Canonical output**: `format_decimal` strips trailing fractional zeros
//!    and never emits a trailing separator (`"1"`, not `"1."` or `"1.0"`).
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | `""` | `is_decimal_string` is false, `parse_decimal` fails |
//! | `"1.2.3"`, `"1e5"`, `"-1"` | Rejected (digits and one `.` only) |
//! | `"."`, `".5"`, `"5."` | Accepted; missing parts read as zero |
//! | Absent value | Formatted as [`UNKNOWN`] by the `_or_unknown` variants |

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::CodecError;

/// Sentinel shown for a value that is not known (yet).
pub const UNKNOWN: &str = "?";

/// Sentinel shown for values above the practically-infinite threshold.
pub const PRACTICALLY_INFINITE: &str = "Practically Infinite";

/// Whole units above `2^PRACTICALLY_INFINITE_BITS` are displayed as
/// [`PRACTICALLY_INFINITE`] ("unlimited approval" style values).
pub const PRACTICALLY_INFINITE_BITS: usize = 100;

/// `10^scale` as a big integer.
#[must_use]
pub fn pow10(scale: u32) -> BigUint {
    BigUint::from(10u32).pow(scale)
}

/// Whether `value` is a non-empty string of digits with at most one `.`.
///
/// Both sides of the separator may be empty, so `".5"`, `"5."` and even
/// `"."` are accepted.
#[must_use]
pub fn is_decimal_string(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let mut seen_point = false;
    for byte in value.bytes() {
        match byte {
            b'0'..=b'9' => {}
            b'.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    true
}

/// Parse a decimal string into an integer scaled by `10^scale`.
///
/// The fractional part is right-padded with zeros up to `scale` digits and
/// truncated (not rounded) when longer.
///
/// # Errors
///
/// Returns [`CodecError::NotDecimal`] when `!is_decimal_string(value)`.
pub fn parse_decimal(value: &str, scale: u32) -> Result<BigUint, CodecError> {
    if !is_decimal_string(value) {
        return Err(CodecError::NotDecimal);
    }
    let (integer, fraction) = value.split_once('.').unwrap_or((value, ""));
    let integer = if integer.is_empty() { "0" } else { integer };
    let scale = scale as usize;
    // Digits are ASCII, so byte slicing is on char boundaries.
    let kept = &fraction[..fraction.len().min(scale)];

    let mut digits = String::with_capacity(integer.len() + scale);
    digits.push_str(integer);
    digits.push_str(kept);
    digits.extend(std::iter::repeat_n('0', scale - kept.len()));

    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or(CodecError::NotDecimal)
}

/// Format a scaled integer as a decimal string.
///
/// When `max_decimals` is given the fractional digits are truncated to that
/// length before trailing zeros are stripped.
///
/// ```
/// use sigform_codec::{BigUint, format_decimal};
///
/// let v = BigUint::from(1_123_456_789_012_345_678u64);
/// assert_eq!(format_decimal(&v, 18, None), "1.123456789012345678");
/// assert_eq!(format_decimal(&v, 18, Some(2)), "1.12");
/// ```
#[must_use]
pub fn format_decimal(value: &BigUint, scale: u32, max_decimals: Option<usize>) -> String {
    let divisor = pow10(scale);
    let integer = value / &divisor;
    let fraction = value % &divisor;
    if fraction.is_zero() {
        return integer.to_string();
    }

    let padded = format!("{:0>width$}", fraction.to_string(), width = scale as usize);
    let truncated = match max_decimals {
        Some(max) => &padded[..padded.len().min(max)],
        None => padded.as_str(),
    };
    let trimmed = truncated.trim_end_matches('0');
    if trimmed.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{trimmed}")
    }
}

/// [`format_decimal`], or [`UNKNOWN`] when the value is absent.
#[must_use]
pub fn format_decimal_or_unknown(
    value: Option<&BigUint>,
    scale: u32,
    max_decimals: Option<usize>,
) -> String {
    match value {
        Some(value) => format_decimal(value, scale, max_decimals),
        None => UNKNOWN.to_owned(),
    }
}

/// Whether the whole-unit part of `value` exceeds `2^100`.
#[must_use]
pub fn is_practically_infinite(value: &BigUint, scale: u32) -> bool {
    let threshold = BigUint::from(1u8) << PRACTICALLY_INFINITE_BITS;
    value / pow10(scale) > threshold
}

/// Display formatting for balances and allowances.
///
/// Sentinels take priority in this order: [`UNKNOWN`] for an absent value,
/// then [`PRACTICALLY_INFINITE`], then the regular [`format_decimal`] output.
#[must_use]
pub fn format_decimal_display(
    value: Option<&BigUint>,
    scale: u32,
    max_decimals: Option<usize>,
) -> String {
    match value {
        None => UNKNOWN.to_owned(),
        Some(value) if is_practically_infinite(value, scale) => PRACTICALLY_INFINITE.to_owned(),
        Some(value) => format_decimal(value, scale, max_decimals),
    }
}
