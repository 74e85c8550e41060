#![forbid(unsafe_code)]

//! The contract between a text input and its value type.
//!
//! # Invariants
//!
//! 1. `sanitize` is idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
//!    The controller writes the sanitized text back into the control and
//!    relies on the second pass being a no-op.
//! 2. All three functions are total. A panic inside one is a programming
//!    error and propagates to the host unchanged.
//! 3. `try_parse` is only consulted for text with visible content; blank
//!    text always means "no value" regardless of the contract.

use std::fmt;
use std::marker::PhantomData;

use sigform_codec::CodecError;

/// Why non-empty text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text fails the grammar check (e.g. two decimal points).
    #[error("malformed input: {0}")]
    Format(String),
    /// The text is well formed but not an acceptable value
    /// (e.g. not a hex address).
    #[error("rejected input: {0}")]
    Domain(String),
}

impl ParseError {
    /// Short label for logs; never includes the rejected text.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Format(_) => "format",
            Self::Domain(_) => "domain",
        }
    }
}

impl From<CodecError> for ParseError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::NotDecimal => Self::Format(error.to_string()),
            CodecError::InvalidAddress | CodecError::AddressOverflow { .. } => {
                Self::Domain(error.to_string())
            }
        }
    }
}

/// Conversion rules between the text of an input and its typed value.
pub trait InputContract: 'static {
    /// The parsed value type.
    type Value: PartialEq + 'static;

    /// Normalize raw text (trim, strip separators, ...). Must be idempotent.
    fn sanitize(&self, raw: &str) -> String;

    /// Parse sanitized, non-blank text.
    ///
    /// `Ok(None)` is accepted for contracts where some non-blank text
    /// legitimately means "no value".
    fn try_parse(&self, sanitized: &str) -> Result<Option<Self::Value>, ParseError>;

    /// Render a value (or its absence) back into text.
    fn serialize(&self, value: Option<&Self::Value>) -> String;
}

/// A contract assembled from three closures.
///
/// Closures may read reactive cells; a bound controller re-synchronizes
/// whenever a cell read inside them changes.
///
/// ```
/// use sigform_widgets::input::{FnContract, InputContract, ParseError};
///
/// let percent = FnContract::new(
///     |raw: &str| raw.trim().trim_end_matches('%').to_string(),
///     |text: &str| {
///         text.parse::<u8>()
///             .ok()
///             .filter(|p| *p <= 100)
///             .map(Some)
///             .ok_or_else(|| ParseError::Domain("not a percentage".into()))
///     },
///     |value: Option<&u8>| value.map(|p| p.to_string()).unwrap_or_default(),
/// );
/// assert_eq!(percent.try_parse("42"), Ok(Some(42)));
/// assert!(percent.try_parse("420").is_err());
/// ```
pub struct FnContract<T, S, P, Z> {
    sanitize: S,
    try_parse: P,
    serialize: Z,
    _value: PhantomData<fn() -> T>,
}

impl<T, S, P, Z> FnContract<T, S, P, Z>
where
    S: Fn(&str) -> String,
    P: Fn(&str) -> Result<Option<T>, ParseError>,
    Z: Fn(Option<&T>) -> String,
{
    pub fn new(sanitize: S, try_parse: P, serialize: Z) -> Self {
        Self {
            sanitize,
            try_parse,
            serialize,
            _value: PhantomData,
        }
    }
}

impl<T, S, P, Z> InputContract for FnContract<T, S, P, Z>
where
    T: PartialEq + 'static,
    S: Fn(&str) -> String + 'static,
    P: Fn(&str) -> Result<Option<T>, ParseError> + 'static,
    Z: Fn(Option<&T>) -> String + 'static,
{
    type Value = T;

    fn sanitize(&self, raw: &str) -> String {
        (self.sanitize)(raw)
    }

    fn try_parse(&self, sanitized: &str) -> Result<Option<T>, ParseError> {
        (self.try_parse)(sanitized)
    }

    fn serialize(&self, value: Option<&T>) -> String {
        (self.serialize)(value)
    }
}

impl<T, S, P, Z> fmt::Debug for FnContract<T, S, P, Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnContract").finish_non_exhaustive()
    }
}

/// Unparsed free text: the value is the sanitized string itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextContract {
    trim: bool,
}

impl TextContract {
    /// Keep text exactly as typed.
    #[must_use]
    pub const fn verbatim() -> Self {
        Self { trim: false }
    }

    /// Strip surrounding whitespace.
    #[must_use]
    pub const fn trimmed() -> Self {
        Self { trim: true }
    }
}

impl Default for TextContract {
    fn default() -> Self {
        Self::verbatim()
    }
}

impl InputContract for TextContract {
    type Value = String;

    fn sanitize(&self, raw: &str) -> String {
        if self.trim {
            raw.trim().to_owned()
        } else {
            raw.to_owned()
        }
    }

    fn try_parse(&self, sanitized: &str) -> Result<Option<String>, ParseError> {
        Ok(Some(sanitized.to_owned()))
    }

    fn serialize(&self, value: Option<&String>) -> String {
        value.cloned().unwrap_or_default()
    }
}
