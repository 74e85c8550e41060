#![forbid(unsafe_code)]

//! Hex account addresses.
//!
//! An [`Address`] is 20 raw bytes. Text form is `0x` followed by exactly 40
//! hex digits; parsing accepts either letter case, formatting always emits
//! lowercase with leading zeros kept.

use core::fmt;
use core::str::FromStr;

use num_bigint::BigUint;

use crate::error::CodecError;

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; Address::LEN]);

impl Address {
    /// Address width in bytes.
    pub const LEN: usize = 20;

    /// The all-zero address.
    pub const ZERO: Self = Self([0; Self::LEN]);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Interpret the address as a big-endian unsigned integer.
    #[must_use]
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// Build an address from an integer, left-padding with zero bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::AddressOverflow`] when `value >= 2^160`.
    pub fn from_biguint(value: &BigUint) -> Result<Self, CodecError> {
        let bytes = value.to_bytes_be();
        // `to_bytes_be` yields `[0]` for zero, which still fits.
        if bytes.len() > Self::LEN {
            return Err(CodecError::AddressOverflow { bits: value.bits() });
        }
        let mut out = [0u8; Self::LEN];
        out[Self::LEN - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

/// Parse `0x` + 40 hex digits into an [`Address`].
///
/// No trimming happens here; sanitizing input text is the caller's job.
///
/// # Errors
///
/// Returns [`CodecError::InvalidAddress`] for any other shape.
pub fn parse_address(text: &str) -> Result<Address, CodecError> {
    let digits = text
        .strip_prefix("0x")
        .ok_or(CodecError::InvalidAddress)?;
    if digits.len() != Address::LEN * 2 {
        return Err(CodecError::InvalidAddress);
    }
    let mut bytes = [0u8; Address::LEN];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| CodecError::InvalidAddress)?;
    Ok(Address(bytes))
}

/// Case-insensitive comparison of two optional address strings.
///
/// Two absent addresses are the same; one absent address never matches.
#[must_use]
pub fn is_same_address(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn parse_accepts_either_case() {
        let upper = parse_address(MIXED).unwrap();
        let lower = parse_address(&MIXED.to_ascii_lowercase()).unwrap();
        assert_eq!(upper, lower);
        assert_eq!(
            upper.to_string(),
            "0x52908400098527886e0f7030069857d2e4169ee7"
        );
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for bad in [
            "",
            "0x",
            "52908400098527886E0F7030069857D2E4169EE7",
            "0X52908400098527886E0F7030069857D2E4169EE7",
            "0x52908400098527886E0F7030069857D2E4169EE",
            "0x52908400098527886E0F7030069857D2E4169EE7a",
            "0xZZ908400098527886E0F7030069857D2E4169EE7",
            " 0x52908400098527886E0F7030069857D2E4169EE7",
        ] {
            assert_eq!(parse_address(bad), Err(CodecError::InvalidAddress), "{bad:?}");
        }
    }

    #[test]
    fn display_keeps_leading_zeros() {
        let addr = Address::from_biguint(&BigUint::from(0xabcu32)).unwrap();
        assert_eq!(addr.to_string(), format!("0x{:0>40}", "abc"));
        assert_eq!(addr.to_biguint(), BigUint::from(0xabcu32));
        assert_eq!(Address::from_biguint(&BigUint::from(0u8)).unwrap(), Address::ZERO);
    }

    #[test]
    fn from_biguint_rejects_wide_values() {
        let too_wide = BigUint::from(1u8) << 160usize;
        assert_eq!(
            Address::from_biguint(&too_wide),
            Err(CodecError::AddressOverflow { bits: 161 })
        );
    }

    #[test]
    fn same_address_ignores_case() {
        let lower = MIXED.to_ascii_lowercase();
        assert!(is_same_address(Some(MIXED), Some(&lower)));
        assert!(is_same_address(None, None));
        assert!(!is_same_address(Some(MIXED), None));
        assert!(!is_same_address(Some(MIXED), Some("0x0000000000000000000000000000000000000000")));
    }
}
