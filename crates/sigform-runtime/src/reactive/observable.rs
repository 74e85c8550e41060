#![forbid(unsafe_code)]

//! Version-tracked shared cells with subscriber callbacks.
//!
//! # Failure Modes
//!
//! - Writing a cell from inside its own `with` closure panics (`RefCell`
//!   double borrow). Clone the value out first or use `get`.
//! - Subscriber panic: propagates to the writer; later subscribers of that
//!   notification cycle are skipped.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::batch;
use super::tracking::{self, Dependency};

type Callback<T> = Rc<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<dyn Fn(&T)>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` yields another handle to the same cell.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new cell holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone the current value and register it as a dependency of the
    /// running effect, if any.
    #[must_use]
    pub fn get(&self) -> T {
        self.track();
        self.inner.borrow().value.clone()
    }

    /// Clone the current value without registering a dependency.
    #[must_use]
    pub fn peek(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value (tracked).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.inner.borrow().value)
    }

    /// Borrow the current value without registering a dependency.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Store `value` and notify subscribers, unless it equals the current
    /// value.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
        true
    }

    /// Store `value` and notify subscribers unconditionally.
    pub fn replace(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Derive a new value from a copy of the current one and [`set`](Self::set) it.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.peek();
        f(&mut next);
        self.set(next)
    }

    /// Register `callback` to run after every notifying write.
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Callback<T> = Rc::new(callback);
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|weak| weak.strong_count() > 0);
        inner.subscribers.push(Rc::downgrade(&callback));
        Subscription::hold(callback)
    }

    /// Number of writes that changed (or replaced) the value.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Whether two handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn key(&self) -> usize {
        Rc::as_ptr(&self.inner).cast::<()>() as usize
    }

    fn track(&self) {
        if tracking::is_tracking() {
            tracking::record(Box::new(self.clone()));
        }
    }

    fn notify(&self) {
        if batch::is_active() {
            let this = self.clone();
            batch::enqueue(self.key(), Box::new(move || this.notify_now()));
        } else {
            self.notify_now();
        }
    }

    fn notify_now(&self) {
        // Snapshot first: callbacks may write this cell or subscribe to it.
        let (value, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            let callbacks: Vec<Callback<T>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value.clone(), callbacks)
        };
        for callback in callbacks {
            callback(&value);
        }
    }
}

impl<T: Clone + PartialEq + 'static> Dependency for Observable<T> {
    fn key(&self) -> usize {
        Observable::key(self)
    }

    fn version(&self) -> u64 {
        Observable::version(self)
    }

    fn watch(&self, on_change: Rc<dyn Fn()>) -> Subscription {
        self.subscribe(move |_| on_change())
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Observable")
                .field("value", &inner.value)
                .field("version", &inner.version)
                .finish(),
            Err(_) => f.write_str("Observable { <borrowed> }"),
        }
    }
}

/// RAII handle for a registered callback.
///
/// Cells only keep weak references to their callbacks; the strong one lives
/// here, so dropping the subscription is all it takes to unsubscribe.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl Subscription {
    fn hold<T: 'static>(callback: Callback<T>) -> Self {
        Self {
            _callback: Box::new(callback),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
