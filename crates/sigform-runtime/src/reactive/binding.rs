#![forbid(unsafe_code)]

//! Read-only bindings and subscription lifetimes.
//!
//! A [`Binding<T>`] wraps a source cell plus a transform, for deriving
//! display values such as a formatted balance from reactive state. A
//! [`BindingScope`] collects subscriptions that should live and die with one
//! logical owner (a form, a panel).
//!
//! # Usage
//!
//! ```
//! use sigform_runtime::reactive::{OptionalObservable, bind_optional};
//!
//! let balance = OptionalObservable::<u64>::empty();
//! let label = bind_optional(&balance, |v| match v {
//!     Some(v) => format!("{v} REP"),
//!     None => "? REP".to_string(),
//! });
//! assert_eq!(label.get(), "? REP");
//!
//! balance.write(Some(12));
//! assert_eq!(label.get(), "12 REP");
//! ```
//!
//! # Invariants
//!
//! 1. `Binding::get()` always returns the current (not stale) value.
//! 2. The transform runs on every `get()` call; there is no caching.
//! 3. Reads inside `get()` are tracked, so an [`Effect`](super::Effect) that
//!    reads a binding depends on the binding's sources.
//! 4. Dropping a `BindingScope` releases every subscription made through it.
//!
//! # Failure Modes
//!
//! - Transform panic: propagates to caller of `get()`.
//! - Source dropped while binding alive: binding still works (Rc keeps inner alive).

use std::fmt;
use std::rc::Rc;

use super::observable::{Observable, Subscription};
use super::optional::OptionalObservable;

/// A lazily evaluated, read-only view over reactive state.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: 'static> Binding<T> {
    /// Create a binding that evaluates `f` on each `get()` call.
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    /// Evaluate the binding.
    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }
}

/// Bind to an optional container through `map`, which sees `None` while the
/// value is absent.
pub fn bind_optional<S: PartialEq + 'static, T: 'static>(
    source: &OptionalObservable<S>,
    map: impl Fn(Option<&S>) -> T + 'static,
) -> Binding<T> {
    let src = source.clone();
    Binding::new(move || src.with(|v| map(v)))
}

/// Holds subscriptions for one logical owner.
///
/// When the scope is dropped, all held subscriptions are released.
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe to an observable within this scope.
    pub fn subscribe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        let sub = source.subscribe(callback);
        self.subscriptions.push(sub);
        self
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl Default for BindingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}
