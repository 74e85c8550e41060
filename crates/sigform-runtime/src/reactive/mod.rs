#![forbid(unsafe_code)]

//! Reactive cells for typed inputs.
//!
//! This module provides change-tracking primitives that replace implicit
//! "signal" magic with an explicit publish/subscribe graph:
//!
//! - [`Observable`]: A shared, version-tracked value wrapper with change
//!   notification via subscriber callbacks.
//! - [`OptionalObservable`]: A single-slot holder for a possibly-absent
//!   value. Every write replaces the whole value and always notifies.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//! - [`Effect`]: A body that re-runs whenever a cell it read (via a tracked
//!   read) changes.
//! - [`BatchScope`]: RAII guard that defers all notifications until the
//!   scope exits, so dependents never observe half-applied updates.
//! - [`Binding`] / [`BindingScope`]: lazily evaluated read-only views and a
//!   holder for subscriptions that share a lifetime.
//!
//! # Architecture
//!
//! Cells use `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` callbacks and cleaned up lazily.
//!
//! Tracked reads (`get`, `with`, `read`) record the cell in the innermost
//! tracking frame, if any. [`Effect`] opens such a frame around its body and
//! subscribes to whatever was recorded. Untracked reads (`peek`,
//! `with_untracked`, or anything inside [`untracked`]) record nothing.
//!
//! # Invariants
//!
//! 1. `Observable` version increments exactly once per mutation that changes
//!    the value; `Observable::set` with an equal value is a no-op.
//! 2. `Observable::replace` and every `OptionalObservable` write bump the
//!    version and notify even when the new value is equal.
//! 3. Subscribers are notified in registration order.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. Within a `BatchScope`, values are updated immediately but each cell
//!    notifies at most once, after the outermost scope exits.
//! 6. An effect triggered while it is already running re-runs once after
//!    the current pass; passes are capped at [`MAX_EFFECT_PASSES`].

pub mod batch;
pub mod binding;
pub mod effect;
pub mod observable;
pub mod optional;
mod tracking;

pub use batch::BatchScope;
pub use binding::{Binding, BindingScope, bind_optional};
pub use effect::{Effect, MAX_EFFECT_PASSES};
pub use observable::{Observable, Subscription};
pub use optional::{OptionalObservable, StaleWrite};
pub use tracking::untracked;
