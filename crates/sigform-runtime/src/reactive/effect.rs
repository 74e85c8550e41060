#![forbid(unsafe_code)]

//! Self-tracking effects.
//!
//! An [`Effect`] runs its body once on creation and again whenever any cell
//! the body read through a tracked read is written. Dependencies are
//! re-collected on every run, so a branch that stops reading a cell also
//! stops reacting to it.
//!
//! # Re-entrancy
//!
//! A body may write cells it depends on (for example to normalize them).
//! Such a write does not recurse; it marks the effect for another pass that
//! starts as soon as the current one returns. Bodies are expected to reach
//! a fixed point quickly; after [`MAX_EFFECT_PASSES`] consecutive passes the
//! effect stops, logs a warning, and waits for the next external change.
//!
//! # Failure Modes
//!
//! - Body panic: propagates to whoever triggered the run. The effect is left
//!   mid-run and will not run again.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::observable::Subscription;
use super::tracking::{self, Tracked};

/// Upper bound on back-to-back passes of a single effect.
pub const MAX_EFFECT_PASSES: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Rerun,
    Disposed,
}

struct EffectInner {
    label: &'static str,
    body: RefCell<Box<dyn FnMut()>>,
    subscriptions: RefCell<Vec<Subscription>>,
    phase: Cell<Phase>,
    runs: Cell<u64>,
}

/// A reactive body bound to the cells it reads.
///
/// Dropping the `Effect` (or calling [`dispose`](Self::dispose)) releases
/// every subscription; the body never runs again.
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    /// Create an effect and run it immediately.
    ///
    /// `label` only appears in log events.
    pub fn new(label: &'static str, body: impl FnMut() + 'static) -> Self {
        let inner = Rc::new(EffectInner {
            label,
            body: RefCell::new(Box::new(body)),
            subscriptions: RefCell::new(Vec::new()),
            phase: Cell::new(Phase::Idle),
            runs: Cell::new(0),
        });
        inner.run();
        Self { inner }
    }

    /// Total number of passes the body has executed.
    #[must_use]
    pub fn run_count(&self) -> u64 {
        self.inner.runs.get()
    }

    /// Number of cells the last pass depended on.
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    /// Stop reacting and release all subscriptions.
    pub fn dispose(&self) {
        self.inner.phase.set(Phase::Disposed);
        self.inner.subscriptions.borrow_mut().clear();
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.phase.get() == Phase::Disposed
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.inner.label
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("label", &self.inner.label)
            .field("phase", &self.inner.phase.get())
            .field("runs", &self.inner.runs.get())
            .finish()
    }
}

impl EffectInner {
    fn run(self: &Rc<Self>) {
        match self.phase.get() {
            Phase::Disposed => return,
            Phase::Running | Phase::Rerun => {
                self.phase.set(Phase::Rerun);
                return;
            }
            Phase::Idle => {}
        }

        let mut passes = 0;
        loop {
            passes += 1;
            self.phase.set(Phase::Running);
            self.runs.set(self.runs.get() + 1);
            tracing::trace!(effect = self.label, pass = passes, "effect run");

            let ((), dependencies) = tracking::collect(|| {
                let mut body = self.body.borrow_mut();
                (*body)();
            });

            if self.phase.get() == Phase::Disposed {
                self.subscriptions.borrow_mut().clear();
                return;
            }
            // Writes made before the subscriptions existed never notified us.
            if dependencies.iter().any(Tracked::is_stale) {
                self.phase.set(Phase::Rerun);
            }
            self.resubscribe(&dependencies);

            if self.phase.get() != Phase::Rerun {
                break;
            }
            if passes >= MAX_EFFECT_PASSES {
                tracing::warn!(
                    effect = self.label,
                    passes,
                    "effect did not settle; dropping pending re-run"
                );
                break;
            }
        }
        self.phase.set(Phase::Idle);
    }

    fn resubscribe(self: &Rc<Self>, dependencies: &[Tracked]) {
        let weak = Rc::downgrade(self);
        let on_change: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(effect) = weak.upgrade() {
                effect.run();
            }
        });
        let subscriptions = dependencies
            .iter()
            .map(|tracked| tracked.dependency.watch(Rc::clone(&on_change)))
            .collect();
        *self.subscriptions.borrow_mut() = subscriptions;
    }
}
