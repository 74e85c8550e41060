#![forbid(unsafe_code)]

//! Optional value container.
//!
//! [`OptionalObservable<T>`] holds a possibly-absent typed value, for example
//! a parsed token amount or a list of addresses, shared between a bound input
//! and the business logic around it.
//!
//! # Invariants
//!
//! 1. **Whole-value replacement**: the stored value sits behind an `Rc` and
//!    is never mutated in place. Every write installs a new allocation, so
//!    `Rc::ptr_eq` on two [`deep_read`](OptionalObservable::deep_read)
//!    results tells whether a write happened in between.
//! 2. **Every write notifies**: there is no equality short-circuit here.
//!    Two writes of equal values produce two notification cycles. Callers
//!    that want to skip redundant writes compare first.
//! 3. **Last write wins** unless the caller opts into
//!    [`write_if_version`](OptionalObservable::write_if_version).

use std::fmt;
use std::rc::Rc;

use super::observable::{Observable, Subscription};

/// A guarded write lost against a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stale write: expected version {expected}, container is at {actual}")]
pub struct StaleWrite {
    pub expected: u64,
    pub actual: u64,
}

/// Single-slot reactive holder for an optional value.
pub struct OptionalObservable<T> {
    cell: Observable<Option<Rc<T>>>,
}

impl<T> Clone for OptionalObservable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: PartialEq + 'static> OptionalObservable<T> {
    #[must_use]
    pub fn new(value: Option<T>) -> Self {
        Self {
            cell: Observable::new(value.map(Rc::new)),
        }
    }

    /// An empty container.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Borrow the current value (tracked).
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        self.cell.with(|slot| f(slot.as_deref()))
    }

    /// Borrow the current value without registering a dependency.
    pub fn with_untracked<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        self.cell.with_untracked(|slot| f(slot.as_deref()))
    }

    /// Whether a value is present (tracked).
    #[must_use]
    pub fn is_some(&self) -> bool {
        self.with(|value| value.is_some())
    }

    /// Shared handle to the current value (tracked).
    #[must_use]
    pub fn deep_read(&self) -> Option<Rc<T>> {
        self.cell.get()
    }

    /// Shared handle to the current value without registering a dependency.
    #[must_use]
    pub fn deep_peek(&self) -> Option<Rc<T>> {
        self.cell.peek()
    }

    /// Replace the value and notify every subscriber.
    pub fn write(&self, value: Option<T>) {
        self.cell.replace(value.map(Rc::new));
    }

    /// Replace the value with an already shared one and notify.
    ///
    /// Useful for composite values handed around between several
    /// containers; the container still never mutates them.
    pub fn deep_write(&self, value: Option<Rc<T>>) {
        self.cell.replace(value);
    }

    /// Write only if nobody else wrote since `expected` was observed.
    ///
    /// Lets async refreshes drop results that arrive after a newer write.
    ///
    /// # Errors
    ///
    /// Returns [`StaleWrite`] (and leaves the container untouched) when the
    /// current version differs from `expected`.
    pub fn write_if_version(&self, expected: u64, value: Option<T>) -> Result<(), StaleWrite> {
        let actual = self.version();
        if actual != expected {
            return Err(StaleWrite { expected, actual });
        }
        self.write(value);
        Ok(())
    }

    /// Register `callback` for every write.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(Option<&T>) + 'static) -> Subscription {
        self.cell.subscribe(move |slot| callback(slot.as_deref()))
    }

    /// Number of writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.cell.subscriber_count()
    }

    /// Whether two handles refer to the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.cell.ptr_eq(&other.cell)
    }
}

impl<T: Clone + PartialEq + 'static> OptionalObservable<T> {
    /// Clone the current value out (tracked).
    #[must_use]
    pub fn read(&self) -> Option<T> {
        self.with(|value| value.cloned())
    }

    /// Clone the current value out without registering a dependency.
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        self.with_untracked(|value| value.cloned())
    }
}

impl<T: PartialEq + 'static> Default for OptionalObservable<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: PartialEq + 'static> From<Option<T>> for OptionalObservable<T> {
    fn from(value: Option<T>) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug + PartialEq + 'static> fmt::Debug for OptionalObservable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_untracked(|value| {
            f.debug_struct("OptionalObservable")
                .field("value", &value)
                .field("version", &self.version())
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{BatchScope, Effect};
    use std::cell::{Cell, RefCell};

    #[test]
    fn read_write_and_absent() {
        let slot = OptionalObservable::<u64>::empty();
        assert_eq!(slot.read(), None);
        slot.write(Some(5));
        assert_eq!(slot.read(), Some(5));
        assert!(slot.is_some());
        slot.write(None);
        assert_eq!(slot.peek(), None);
    }

    #[test]
    fn equal_writes_each_notify() {
        let slot = OptionalObservable::new(Some(1u64));
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = slot.subscribe(move |_| h.set(h.get() + 1));

        slot.write(Some(1));
        slot.write(Some(1));
        assert_eq!(hits.get(), 2);
        assert_eq!(slot.version(), 2);
    }

    #[test]
    fn composite_values_are_replaced_wholesale() {
        let slot = OptionalObservable::new(Some(vec!["a".to_string()]));
        let before = slot.deep_peek().unwrap();

        slot.write(Some(vec!["a".to_string()]));
        let after = slot.deep_peek().unwrap();
        assert_eq!(before, after);
        assert!(!Rc::ptr_eq(&before, &after), "every write is a new value");
    }

    #[test]
    fn deep_write_shares_the_allocation() {
        let shared = Rc::new(vec![1, 2, 3]);
        let a = OptionalObservable::empty();
        let b = OptionalObservable::empty();
        a.deep_write(Some(Rc::clone(&shared)));
        b.deep_write(Some(Rc::clone(&shared)));
        assert!(Rc::ptr_eq(&a.deep_read().unwrap(), &b.deep_read().unwrap()));
    }

    #[test]
    fn read_is_tracked_and_peek_is_not() {
        let slot = OptionalObservable::new(Some(1u32));
        let reads = Rc::new(Cell::new(0));
        let (s, r) = (slot.clone(), Rc::clone(&reads));
        let _tracked = Effect::new("read", move || {
            let _ = s.read();
            r.set(r.get() + 1);
        });
        let peeks = Rc::new(Cell::new(0));
        let (s, p) = (slot.clone(), Rc::clone(&peeks));
        let _untracked = Effect::new("peek", move || {
            let _ = s.peek();
            p.set(p.get() + 1);
        });

        slot.write(Some(2));
        assert_eq!(reads.get(), 2);
        assert_eq!(peeks.get(), 1);
    }

    #[test]
    fn version_guard_rejects_out_of_order_refresh() {
        let balance = OptionalObservable::<u64>::empty();
        let issued_at = balance.version();

        balance.write(Some(10)); // newer write lands first
        let late = balance.write_if_version(issued_at, Some(7));
        assert_eq!(
            late,
            Err(StaleWrite {
                expected: 0,
                actual: 1
            })
        );
        assert_eq!(balance.peek(), Some(10));

        assert!(balance.write_if_version(1, Some(11)).is_ok());
        assert_eq!(balance.peek(), Some(11));
    }

    #[test]
    fn batched_writes_notify_once_with_final_value() {
        let slot = OptionalObservable::<u8>::empty();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = slot.subscribe(move |v| s.borrow_mut().push(v.copied()));

        BatchScope::run(|| {
            slot.write(Some(1));
            slot.write(None);
            slot.write(Some(3));
        });
        assert_eq!(*seen.borrow(), vec![Some(3)]);
    }
}
