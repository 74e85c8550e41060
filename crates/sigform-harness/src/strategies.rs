#![forbid(unsafe_code)]

//! `proptest` generators for input text.

use proptest::prelude::*;
use sigform_codec::{Address, BigUint};

/// Well-formed decimal text: optional padding, digits, at most one point.
pub fn decimal_text() -> impl Strategy<Value = String> {
    "[ ]{0,2}[0-9]{0,8}(\\.[0-9]{0,8})?[ ]{0,2}"
}

/// Anything a user might type into an amount field, valid or not.
pub fn amount_keystrokes() -> impl Strategy<Value = String> {
    "[ 0-9.,a-z-]{0,16}"
}

/// Scaled amounts up to `u128::MAX`.
pub fn amount_value() -> impl Strategy<Value = BigUint> {
    any::<u128>().prop_map(BigUint::from)
}

pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; Address::LEN]>().prop_map(Address::from_bytes)
}

/// An address as a user might paste it: either case, optional padding.
pub fn address_text() -> impl Strategy<Value = String> {
    (address(), any::<bool>(), "[ ]{0,2}").prop_map(|(address, upper, pad)| {
        let text = address.to_string();
        let digits = if upper {
            text[2..].to_ascii_uppercase()
        } else {
            text[2..].to_owned()
        };
        format!("{pad}0x{digits}{pad}")
    })
}

/// A list of addresses as text with loose spacing around `separator`.
pub fn address_list_text(separator: char) -> impl Strategy<Value = String> {
    let separator = separator.to_string();
    prop::collection::vec(address_text(), 1..5)
        .prop_map(move |parts| parts.join(separator.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigform_codec::{is_decimal_string, parse_address};

    proptest! {
        #[test]
        fn decimal_text_is_decimal_after_trim(text in decimal_text()) {
            let trimmed = text.trim();
            prop_assert!(trimmed.is_empty() || is_decimal_string(trimmed));
        }

        #[test]
        fn address_text_parses_after_trim(text in address_text()) {
            prop_assert!(parse_address(text.trim()).is_ok());
        }
    }
}
