#![forbid(unsafe_code)]

//! Address inputs: a single address or a separated list of them.

use sigform_codec::{Address, parse_address};

use super::contract::{InputContract, ParseError};

/// One `0x`-prefixed hex address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressContract;

impl InputContract for AddressContract {
    type Value = Address;

    fn sanitize(&self, raw: &str) -> String {
        raw.trim().to_owned()
    }

    fn try_parse(&self, sanitized: &str) -> Result<Option<Address>, ParseError> {
        Ok(Some(parse_address(sanitized)?))
    }

    fn serialize(&self, value: Option<&Address>) -> String {
        value.map(Address::to_string).unwrap_or_default()
    }
}

/// Several addresses in one control, e.g. `"0xab.., 0xcd.."`.
///
/// The text is left exactly as typed; whitespace around each element is
/// ignored when parsing. One bad element rejects the whole list.
///
/// The separator can never occur inside an address or in the padding the
/// list is serialized with, see [`is_valid_separator`](Self::is_valid_separator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressListContract {
    separator: char,
}

impl AddressListContract {
    pub const DEFAULT_SEPARATOR: char = ',';

    #[must_use]
    pub const fn new() -> Self {
        Self {
            separator: Self::DEFAULT_SEPARATOR,
        }
    }

    /// # Panics
    ///
    /// If `separator` fails [`is_valid_separator`](Self::is_valid_separator).
    #[must_use]
    pub fn with_separator(separator: char) -> Self {
        assert!(
            Self::is_valid_separator(separator),
            "{separator:?} cannot separate addresses"
        );
        Self { separator }
    }

    /// Whitespace pads serialized lists, hex digits and `x` spell addresses.
    #[must_use]
    pub fn is_valid_separator(separator: char) -> bool {
        !(separator.is_whitespace()
            || separator.is_ascii_hexdigit()
            || matches!(separator, 'x' | 'X'))
    }

    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }
}

impl Default for AddressListContract {
    fn default() -> Self {
        Self::new()
    }
}

impl InputContract for AddressListContract {
    type Value = Vec<Address>;

    fn sanitize(&self, raw: &str) -> String {
        raw.to_owned()
    }

    fn try_parse(&self, sanitized: &str) -> Result<Option<Vec<Address>>, ParseError> {
        sanitized
            .split(self.separator)
            .enumerate()
            .map(|(index, element)| {
                parse_address(element.trim())
                    .map_err(|_| ParseError::Domain(format!("element {index} is not an address")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn serialize(&self, value: Option<&Vec<Address>>) -> String {
        let Some(addresses) = value else {
            return String::new();
        };
        let joiner = format!("{} ", self.separator);
        addresses
            .iter()
            .map(Address::to_string)
            .collect::<Vec<_>>()
            .join(joiner.as_str())
    }
}
