#![forbid(unsafe_code)]

//! sigform: typed text inputs bound to reactive values.
//!
//! ```
//! use sigform::prelude::*;
//!
//! let amount = OptionalObservable::empty();
//! let field = SyncController::mount(AmountContract::new(18), amount.clone());
//! field.input("0.25");
//! assert_eq!(amount.peek(), Some(parse_decimal("0.25", 18).unwrap()));
//! ```

pub use sigform_codec as codec;
pub use sigform_runtime as runtime;
#[cfg(feature = "widgets")]
pub use sigform_widgets as widgets;

pub mod prelude {
    pub use sigform_codec::{
        Address, BigUint, CodecError, format_decimal, format_decimal_display, is_decimal_string,
        parse_address, parse_decimal,
    };
    pub use sigform_runtime::{
        BatchScope, Binding, Effect, Observable, OptionalObservable, Subscription, bind_optional,
    };

    #[cfg(feature = "widgets")]
    pub use sigform_widgets::{
        AddressContract, AddressListContract, AmountContract, CommitEvent, FormConfig,
        FormValidity, InputContract, ParseError, SyncController, TextContract,
    };
}
