#![forbid(unsafe_code)]

//! Codec error type.

/// Errors raised by the decimal and address codecs.
///
/// Variants never carry the offending input: the same codecs parse text
/// typed into arbitrary fields, and an error may end up in a log line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Input is empty or not of the form `digits[.digits]`.
    #[error("value is not a decimal string")]
    NotDecimal,
    /// Input is not `0x` followed by exactly 40 hex digits.
    #[error("value is not a hex string encoded address")]
    InvalidAddress,
    /// Integer does not fit into a 20-byte address.
    #[error("integer of {bits} bits does not fit into an address")]
    AddressOverflow { bits: u64 },
}
