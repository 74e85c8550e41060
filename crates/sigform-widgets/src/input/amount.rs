#![forbid(unsafe_code)]

//! Fixed-point token amounts.

use sigform_codec::{BigUint, format_decimal, format_decimal_display, is_decimal_string, parse_decimal};
use sigform_runtime::{Binding, OptionalObservable, bind_optional};

use super::contract::{InputContract, ParseError};

/// Decimal text to a scaled integer, e.g. `"1.5"` at scale 18.
///
/// Excess fractional digits are truncated, never rounded. Values are always
/// written back at full scale so a refresh never loses precision; shorter
/// renderings belong to [`amount_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountContract {
    scale: u32,
}

impl AmountContract {
    #[must_use]
    pub const fn new(scale: u32) -> Self {
        Self { scale }
    }

    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }
}

impl InputContract for AmountContract {
    type Value = BigUint;

    fn sanitize(&self, raw: &str) -> String {
        raw.trim().to_owned()
    }

    fn try_parse(&self, sanitized: &str) -> Result<Option<BigUint>, ParseError> {
        if !is_decimal_string(sanitized) {
            return Err(ParseError::Format(format!(
                "expected digits with at most one '.', got {} chars",
                sanitized.chars().count()
            )));
        }
        Ok(Some(parse_decimal(sanitized, self.scale)?))
    }

    fn serialize(&self, value: Option<&BigUint>) -> String {
        value
            .map(|v| format_decimal(v, self.scale, None))
            .unwrap_or_default()
    }
}

/// A display label for a balance-like container: `"?"` while unknown,
/// `"Practically Infinite"` for unlimited allowances, otherwise the amount.
pub fn amount_label(
    source: &OptionalObservable<BigUint>,
    scale: u32,
    display_decimals: Option<usize>,
) -> Binding<String> {
    bind_optional(source, move |value| {
        format_decimal_display(value, scale, display_decimals)
    })
}
