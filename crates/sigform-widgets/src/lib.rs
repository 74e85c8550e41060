#![forbid(unsafe_code)]

//! Typed inputs for sigform.
//!
//! A bound input keeps three things consistent: the free-form text shown in
//! the control, its sanitized form, and an optional typed value held in an
//! [`OptionalObservable`](sigform_runtime::OptionalObservable) that business
//! logic reads and refreshes. See [`input::SyncController`].

pub mod config;
pub mod input;

pub use config::{ConfigError, FieldConfig, FormConfig};
pub use input::{
    AddressContract, AddressListContract, AmountContract, CommitEvent, FnContract, FormValidity,
    InputContract, ParseError, SyncController, SyncControllerBuilder, TextContract,
    ValidityReporter,
};
