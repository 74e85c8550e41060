#![forbid(unsafe_code)]

//! Atomic update batches.
//!
//! While a [`BatchScope`] is alive, writes apply to their cells immediately
//! but subscriber notifications are queued, one entry per cell. When the
//! outermost scope drops, the queue is drained in first-write order, so
//! every dependent observes the final state of all cells written in the
//! batch and never an intermediate one.
//!
//! Notifications fired during the drain run outside any batch; a callback
//! that wants its own writes grouped opens a fresh scope.
//!
//! A scope dropped while the thread is panicking discards its queue.

use std::cell::RefCell;
use std::marker::PhantomData;

type Pending = Box<dyn FnOnce()>;

#[derive(Default)]
struct BatchState {
    depth: usize,
    queue: Vec<(usize, Pending)>,
}

thread_local! {
    static BATCH: RefCell<BatchState> = RefCell::new(BatchState::default());
}

/// RAII guard that defers cell notifications until it drops.
///
/// Scopes nest; only the outermost one flushes.
#[must_use = "notifications flush as soon as the scope is dropped"]
pub struct BatchScope {
    // Batches are per-thread state.
    _not_send: PhantomData<*const ()>,
}

impl BatchScope {
    /// Open a batch (or nest into the current one).
    pub fn new() -> Self {
        BATCH.with(|batch| batch.borrow_mut().depth += 1);
        Self {
            _not_send: PhantomData,
        }
    }

    /// Run `f` inside a batch and flush when it returns.
    pub fn run<R>(f: impl FnOnce() -> R) -> R {
        let _scope = Self::new();
        f()
    }

    /// Current nesting depth (0 when no batch is open).
    #[must_use]
    pub fn depth() -> usize {
        BATCH.with(|batch| batch.borrow().depth)
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let outermost = BATCH.with(|batch| {
            let mut batch = batch.borrow_mut();
            batch.depth = batch.depth.saturating_sub(1);
            batch.depth == 0
        });
        if !outermost {
            return;
        }
        if std::thread::panicking() {
            // Delivering now could panic again mid-unwind and abort.
            BATCH.with(|batch| batch.borrow_mut().queue.clear());
        } else {
            flush();
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("depth", &Self::depth())
            .finish()
    }
}

pub(crate) fn is_active() -> bool {
    BATCH.with(|batch| batch.borrow().depth > 0)
}

/// Queue a notification for the cell identified by `key`, unless one is
/// already pending for it.
pub(crate) fn enqueue(key: usize, notify: Pending) {
    BATCH.with(|batch| {
        let mut batch = batch.borrow_mut();
        if !batch.queue.iter().any(|(pending, _)| *pending == key) {
            batch.queue.push((key, notify));
        }
    });
}

fn flush() {
    loop {
        let queue = BATCH.with(|batch| std::mem::take(&mut batch.borrow_mut().queue));
        if queue.is_empty() {
            break;
        }
        tracing::trace!(cells = queue.len(), "batch flush");
        for (_, notify) in queue {
            notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Observable;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn nested_scopes_flush_once_at_outermost() {
        let obs = Observable::new(0);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| h.set(h.get() + 1));

        {
            let _outer = BatchScope::new();
            {
                let _inner = BatchScope::new();
                obs.set(1);
                assert_eq!(BatchScope::depth(), 2);
            }
            assert_eq!(hits.get(), 0, "inner scope must not flush");
            obs.set(2);
        }
        assert_eq!(hits.get(), 1);
        assert_eq!(BatchScope::depth(), 0);
    }

    #[test]
    fn dependents_see_all_cells_updated() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let observed = Rc::new(RefCell::new(Vec::new()));

        let b_for_a = b.clone();
        let o = Rc::clone(&observed);
        let _sub = a.subscribe(move |a| o.borrow_mut().push((*a, b_for_a.peek())));

        BatchScope::run(|| {
            a.set(1);
            b.set(10);
        });
        assert_eq!(*observed.borrow(), vec![(1, 10)]);
    }

    #[test]
    fn flush_order_follows_first_write() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let la = Rc::clone(&log);
        let lb = Rc::clone(&log);
        let _sa = a.subscribe(move |_| la.borrow_mut().push('a'));
        let _sb = b.subscribe(move |_| lb.borrow_mut().push('b'));

        BatchScope::run(|| {
            b.set(1);
            a.set(1);
            b.set(2);
        });
        assert_eq!(*log.borrow(), vec!['b', 'a']);
    }

    #[test]
    fn writes_during_flush_are_delivered() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let b_writer = b.clone();
        let _sa = a.subscribe(move |v| {
            b_writer.set(v * 10);
        });
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let _sb = b.subscribe(move |v| s.set(*v));

        BatchScope::run(|| {
            a.set(4);
        });
        assert_eq!(seen.get(), 40);
    }
}
