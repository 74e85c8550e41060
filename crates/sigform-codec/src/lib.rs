#![forbid(unsafe_code)]

//! Pure codecs behind sigform's typed inputs.
//!
//! - [`decimal`]: fixed-point decimal strings to and from scaled integers
//!   ([`BigUint`](num_bigint::BigUint) multiplied by `10^scale`).
//! - [`address`]: 20-byte hex account addresses.
//!
//! Nothing in this crate holds state. Values are non-negative only; there is
//! no sign handling anywhere in the decimal codec.

pub mod address;
pub mod decimal;
pub mod error;

pub use address::{Address, is_same_address, parse_address};
pub use decimal::{
    PRACTICALLY_INFINITE, PRACTICALLY_INFINITE_BITS, UNKNOWN, format_decimal,
    format_decimal_display, format_decimal_or_unknown, is_decimal_string,
    is_practically_infinite, parse_decimal, pow10,
};
pub use error::CodecError;

pub use num_bigint::BigUint;
