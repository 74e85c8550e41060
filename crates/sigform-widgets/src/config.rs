#![forbid(unsafe_code)]

//! Field configuration as data.
//!
//! A form describes its inputs in TOML; each entry names the contract the
//! field is bound with.
//!
//! ```toml
//! [fields.amount]
//! kind = "amount"
//! scale = 18
//! display_decimals = 6
//!
//! [fields.recipients]
//! kind = "address_list"
//! separator = ";"
//!
//! [fields.memo]
//! kind = "text"
//! trim = true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sigform_codec::BigUint;
use sigform_runtime::{Binding, OptionalObservable};

use crate::input::{
    AddressContract, AddressListContract, AmountContract, TextContract, amount_label,
};

/// Largest accepted scale; `10^77` is the biggest power of ten below `2^256`.
pub const MAX_SCALE: u32 = 77;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("field `{field}`: scale {scale} exceeds {}", MAX_SCALE)]
    InvalidScale { field: String, scale: u32 },
    #[error("field `{field}`: display_decimals {display_decimals} exceeds scale {scale}")]
    DisplayDecimalsExceedsScale {
        field: String,
        display_decimals: usize,
        scale: u32,
    },
    #[error("field `{field}`: {separator:?} cannot separate addresses")]
    InvalidSeparator { field: String, separator: char },
    #[error("no field named `{0}`")]
    UnknownField(String),
    #[error("field `{field}` is `{actual}`, not `{expected}`")]
    KindMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountFieldConfig {
    pub scale: u32,
    /// Fractional digits shown by [`FormConfig::amount_label`]. The editable
    /// text always carries the full scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_decimals: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressListFieldConfig {
    #[serde(default = "default_separator")]
    pub separator: char,
}

fn default_separator() -> char {
    AddressListContract::DEFAULT_SEPARATOR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextFieldConfig {
    #[serde(default)]
    pub trim: bool,
}

/// One input's contract, tagged by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldConfig {
    Amount(AmountFieldConfig),
    Address,
    AddressList(AddressListFieldConfig),
    Text(TextFieldConfig),
}

impl FieldConfig {
    /// The `kind` tag as written in TOML.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Amount(_) => "amount",
            Self::Address => "address",
            Self::AddressList(_) => "address_list",
            Self::Text(_) => "text",
        }
    }

    #[must_use]
    pub fn build_amount(&self) -> Option<AmountContract> {
        match self {
            Self::Amount(cfg) => Some(AmountContract::new(cfg.scale)),
            _ => None,
        }
    }

    #[must_use]
    pub fn build_address(&self) -> Option<AddressContract> {
        matches!(self, Self::Address).then_some(AddressContract)
    }

    /// `None` for other kinds and for a separator that validation rejects.
    #[must_use]
    pub fn build_address_list(&self) -> Option<AddressListContract> {
        match self {
            Self::AddressList(cfg) if AddressListContract::is_valid_separator(cfg.separator) => {
                Some(AddressListContract::with_separator(cfg.separator))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn build_text(&self) -> Option<TextContract> {
        match self {
            Self::Text(cfg) if cfg.trim => Some(TextContract::trimmed()),
            Self::Text(_) => Some(TextContract::verbatim()),
            _ => None,
        }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        match self {
            Self::Amount(cfg) if cfg.scale > MAX_SCALE => Err(ConfigError::InvalidScale {
                field: field.to_owned(),
                scale: cfg.scale,
            }),
            Self::Amount(AmountFieldConfig {
                scale,
                display_decimals: Some(display_decimals),
            }) if *display_decimals > *scale as usize => {
                Err(ConfigError::DisplayDecimalsExceedsScale {
                    field: field.to_owned(),
                    display_decimals: *display_decimals,
                    scale: *scale,
                })
            }
            Self::AddressList(cfg) if !AddressListContract::is_valid_separator(cfg.separator) => {
                Err(ConfigError::InvalidSeparator {
                    field: field.to_owned(),
                    separator: cfg.separator,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Every input of one form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldConfig>,
}

impl FormConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Toml`] for malformed documents or unknown kinds, or a
    /// validation error for the first offending field.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        for (name, field) in &config.fields {
            field.validate(name)?;
        }
        tracing::debug!(fields = config.fields.len(), "form config loaded");
        Ok(config)
    }

    /// Read and validate a TOML file.
    ///
    /// # Errors
    ///
    /// As [`from_toml_str`](Self::from_toml_str), plus [`ConfigError::Io`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Look up a field by name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownField`] when absent.
    pub fn field(&self, name: &str) -> Result<&FieldConfig, ConfigError> {
        self.fields
            .get(name)
            .ok_or_else(|| ConfigError::UnknownField(name.to_owned()))
    }

    pub fn amount(&self, name: &str) -> Result<AmountContract, ConfigError> {
        self.build(name, "amount", FieldConfig::build_amount)
    }

    /// A read-only label over `source`, rendered with the field's scale and
    /// `display_decimals`.
    ///
    /// # Errors
    ///
    /// As [`amount`](Self::amount).
    pub fn amount_label(
        &self,
        name: &str,
        source: &OptionalObservable<BigUint>,
    ) -> Result<Binding<String>, ConfigError> {
        let cfg = self.build(name, "amount", |field| match field {
            FieldConfig::Amount(cfg) => Some(*cfg),
            _ => None,
        })?;
        Ok(amount_label(source, cfg.scale, cfg.display_decimals))
    }

    pub fn address(&self, name: &str) -> Result<AddressContract, ConfigError> {
        self.build(name, "address", FieldConfig::build_address)
    }

    pub fn address_list(&self, name: &str) -> Result<AddressListContract, ConfigError> {
        self.build(name, "address_list", FieldConfig::build_address_list)
    }

    pub fn text(&self, name: &str) -> Result<TextContract, ConfigError> {
        self.build(name, "text", FieldConfig::build_text)
    }

    fn build<T>(
        &self,
        name: &str,
        expected: &'static str,
        build: impl FnOnce(&FieldConfig) -> Option<T>,
    ) -> Result<T, ConfigError> {
        let field = self.field(name)?;
        build(field).ok_or_else(|| ConfigError::KindMismatch {
            field: name.to_owned(),
            expected,
            actual: field.kind(),
        })
    }
}
