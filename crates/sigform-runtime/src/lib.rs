#![forbid(unsafe_code)]

//! Reactive runtime for sigform.
//!
//! Everything here is single-threaded and synchronous: a write to a cell
//! runs every dependent effect before the write returns (or before the
//! enclosing [`BatchScope`](reactive::BatchScope) closes).

pub mod reactive;

pub use reactive::{
    BatchScope, Binding, BindingScope, Effect, Observable, OptionalObservable, StaleWrite,
    Subscription, bind_optional, untracked,
};
