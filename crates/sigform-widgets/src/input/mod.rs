#![forbid(unsafe_code)]

//! Text inputs bound to typed values.
//!
//! - [`InputContract`]: the `{sanitize, try_parse, serialize}` triple for one
//!   value type, plus ready-made contracts for amounts, addresses, address
//!   lists and plain text.
//! - [`SyncController`]: keeps the raw text and the typed value converged
//!   in both directions and tracks validity.
//! - [`ValidityReporter`] / [`FormValidity`]: side-channel validity flags for
//!   disabling dependent actions.
//!
//! # Error taxonomy
//!
//! | Case | Text | Value | Invalid flag |
//! |------|------|-------|--------------|
//! | Nothing entered | empty / whitespace | absent | `false` |
//! | Format error | grammar check fails | absent | `true` |
//! | Domain error | grammatical, rejected by `try_parse` | absent | `true` |

pub mod address;
pub mod amount;
pub mod contract;
pub mod controller;
pub mod validity;

pub use address::{AddressContract, AddressListContract};
pub use amount::{AmountContract, amount_label};
pub use contract::{FnContract, InputContract, ParseError, TextContract};
pub use controller::{CommitEvent, SyncController, SyncControllerBuilder};
pub use validity::{FormValidity, ValidityReporter};

/// `tracing` target for every input event.
pub const LOG_TARGET: &str = "sigform::input";
