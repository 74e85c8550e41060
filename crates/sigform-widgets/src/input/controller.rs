#![forbid(unsafe_code)]

//! Two-way synchronization between input text and a typed value.
//!
//! A mounted [`SyncController`] owns two effects over one raw text cell and
//! one [`OptionalObservable`]:
//!
//! - **text to value** runs whenever the text (or any cell the contract
//!   reads) changes. It normalizes the text in place, recomputes the invalid
//!   flag, and writes the parsed value when it differs from the held one.
//! - **value to text** runs whenever the value (or any cell the contract
//!   reads) changes. It rewrites the text from the value unless the current
//!   text is invalid or already stands for the held value.
//!
//! Each step runs inside a [`BatchScope`], so no observer sees the text
//! updated while the value is stale or the other way round.
//!
//! # Invariants
//!
//! 1. Blank text is valid and means "no value".
//! 2. Invalid text is never overwritten by a refresh of the value.
//! 3. Text that parses to the held value is left alone, so `"1.50"`
//!    survives a refresh with `1.5`.
//! 4. Both steps write only when their target differs, so one edit or one
//!    refresh settles within two alternations.
//! 5. The pending-commit flag is set only by edits that change the value,
//!    and is delivered only through [`SyncController::flush_commit`].
//!
//! # Failure Modes
//!
//! - Contract panic: propagates to whoever wrote the triggering cell. The
//!   affected effect stops reacting; the controller should be dropped.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use sigform_runtime::{BatchScope, Effect, Observable, OptionalObservable, untracked};
use tracing::{debug, trace};

use super::LOG_TARGET;
use super::contract::{InputContract, ParseError};
use super::validity::ValidityReporter;

/// UI events on which a pending value change is handed to `on_commit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitEvent {
    /// The control fired a change event.
    Change,
    /// The control lost focus.
    Blur,
    /// The enclosing form was submitted.
    Submit,
}

type CommitCallback = Box<dyn Fn(CommitEvent)>;

struct FieldState<C: InputContract> {
    contract: C,
    raw: Observable<String>,
    value: OptionalObservable<C::Value>,
    invalid: Observable<bool>,
    pending_commit: Cell<bool>,
    disabled: Option<Observable<bool>>,
    reporter: ValidityReporter,
    on_commit: Option<CommitCallback>,
}

impl<C: InputContract> FieldState<C> {
    fn parse(&self, sanitized: &str) -> Result<Option<C::Value>, ParseError> {
        if sanitized.trim().is_empty() {
            return Ok(None);
        }
        self.contract.try_parse(sanitized)
    }

    /// Text to value. Returns whether the value was written.
    fn sync_text_to_value(&self) -> bool {
        let _batch = BatchScope::new();

        let raw = self.raw.get();
        let sanitized = self.contract.sanitize(&raw);
        if sanitized != raw {
            trace!(
                target: LOG_TARGET,
                before = raw.len(),
                after = sanitized.len(),
                "normalized input text"
            );
            self.raw.set(sanitized.clone());
        }

        let parsed = self.parse(&sanitized);
        let has_content = !sanitized.trim().is_empty();
        let invalid = has_content && parsed.is_err();
        self.invalid.set(invalid);
        self.reporter.report(invalid);

        if self.disabled.as_ref().is_some_and(Observable::get) {
            debug!(target: LOG_TARGET, invalid, "input disabled; value left untouched");
            return false;
        }

        match parsed {
            Err(error) => {
                debug!(target: LOG_TARGET, kind = error.kind(), len = sanitized.len(), "input rejected");
                if self.value.with_untracked(|held| held.is_none()) {
                    return false;
                }
                self.value.write(None);
                true
            }
            Ok(parsed) => {
                if self.value.with_untracked(|held| held == parsed.as_ref()) {
                    return false;
                }
                trace!(target: LOG_TARGET, present = parsed.is_some(), "value updated from input");
                self.pending_commit.set(true);
                self.value.write(parsed);
                true
            }
        }
    }

    /// Value to text. Returns whether the text was overwritten.
    fn sync_value_to_text(&self) -> bool {
        let _batch = BatchScope::new();

        // Read first so the dependency survives the early returns below.
        let held = self.value.deep_read();

        let sanitized = self.contract.sanitize(&self.raw.peek());
        let Ok(parsed) = self.parse(&sanitized) else {
            trace!(target: LOG_TARGET, "input text invalid; refresh ignored");
            return false;
        };
        if parsed.as_ref() == held.as_deref() {
            return false;
        }
        let serialized = self.contract.serialize(held.as_deref());
        if sanitized == serialized {
            return false;
        }
        debug!(
            target: LOG_TARGET,
            present = held.is_some(),
            len = serialized.len(),
            "input text replaced from value"
        );
        self.raw.set(serialized);
        true
    }
}

/// Configures and mounts a [`SyncController`].
#[must_use = "call mount() to start synchronizing"]
pub struct SyncControllerBuilder<C: InputContract> {
    contract: C,
    value: OptionalObservable<C::Value>,
    raw: Option<Observable<String>>,
    disabled: Option<Observable<bool>>,
    reporter: ValidityReporter,
    on_commit: Option<CommitCallback>,
}

impl<C: InputContract> SyncControllerBuilder<C> {
    /// Use an existing text cell instead of one seeded from the value.
    ///
    /// Its current content wins over the value on mount.
    pub fn raw_text(mut self, raw: Observable<String>) -> Self {
        self.raw = Some(raw);
        self
    }

    /// While `disabled` holds `true`, edits never reach the value.
    pub fn disabled(mut self, disabled: Observable<bool>) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Mirror the invalid flag into `target`.
    pub fn report_validity_to(mut self, target: Observable<bool>) -> Self {
        self.reporter = ValidityReporter::new(target);
        self
    }

    /// Called by [`SyncController::flush_commit`] when an edit changed the
    /// value since the last flush.
    pub fn on_commit(mut self, callback: impl Fn(CommitEvent) + 'static) -> Self {
        self.on_commit = Some(Box::new(callback));
        self
    }

    /// Start both effects.
    pub fn mount(self) -> SyncController<C> {
        let raw = match self.raw {
            Some(raw) => raw,
            None => {
                let seed = untracked(|| self.contract.serialize(self.value.deep_peek().as_deref()));
                Observable::new(seed)
            }
        };

        let state = Rc::new(FieldState {
            contract: self.contract,
            raw,
            value: self.value,
            invalid: Observable::new(false),
            pending_commit: Cell::new(false),
            disabled: self.disabled,
            reporter: self.reporter,
            on_commit: self.on_commit,
        });

        let a = Rc::clone(&state);
        let text_to_value = Effect::new("input.text_to_value", move || {
            a.sync_text_to_value();
        });
        let b = Rc::clone(&state);
        let value_to_text = Effect::new("input.value_to_text", move || {
            b.sync_value_to_text();
        });

        SyncController {
            state,
            _text_to_value: text_to_value,
            _value_to_text: value_to_text,
        }
    }
}

/// Keeps an input's text and its typed value converged.
///
/// Dropping the controller stops synchronization; the cells stay usable.
///
/// ```
/// use sigform_runtime::OptionalObservable;
/// use sigform_widgets::input::{AmountContract, SyncController};
///
/// let amount = OptionalObservable::empty();
/// let field = SyncController::builder(AmountContract::new(6), amount.clone()).mount();
///
/// field.input(" 1.50 ");
/// assert_eq!(field.raw_text(), "1.50");
/// assert_eq!(amount.peek(), Some(1_500_000u32.into()));
///
/// amount.write(Some(2_000_000u32.into()));
/// assert_eq!(field.raw_text(), "2");
/// ```
pub struct SyncController<C: InputContract> {
    state: Rc<FieldState<C>>,
    _text_to_value: Effect,
    _value_to_text: Effect,
}

impl<C: InputContract> SyncController<C> {
    pub fn builder(contract: C, value: OptionalObservable<C::Value>) -> SyncControllerBuilder<C> {
        SyncControllerBuilder {
            contract,
            value,
            raw: None,
            disabled: None,
            reporter: ValidityReporter::detached(),
            on_commit: None,
        }
    }

    /// Mount with default options.
    pub fn mount(contract: C, value: OptionalObservable<C::Value>) -> Self {
        Self::builder(contract, value).mount()
    }

    /// Replace the text, as a keystroke or paste would.
    pub fn input(&self, text: impl Into<String>) {
        self.state.raw.set(text.into());
    }

    /// Current text (tracked).
    #[must_use]
    pub fn raw_text(&self) -> String {
        self.state.raw.get()
    }

    /// The text cell, for binding to a control.
    #[must_use]
    pub fn raw_text_observable(&self) -> Observable<String> {
        self.state.raw.clone()
    }

    /// The value container shared with business logic.
    #[must_use]
    pub fn value(&self) -> &OptionalObservable<C::Value> {
        &self.state.value
    }

    /// Whether non-blank text failed to parse (tracked).
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.state.invalid.get()
    }

    #[must_use]
    pub fn invalid_observable(&self) -> Observable<bool> {
        self.state.invalid.clone()
    }

    /// Whether edits are currently kept from the value (tracked).
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.state.disabled.as_ref().is_some_and(Observable::get)
    }

    /// Whether an edit changed the value since the last flush.
    #[must_use]
    pub fn has_pending_commit(&self) -> bool {
        self.state.pending_commit.get()
    }

    /// Deliver a pending value change to `on_commit`.
    ///
    /// The pending flag is cleared whenever it was set. Returns whether the
    /// callback ran.
    pub fn flush_commit(&self, event: CommitEvent) -> bool {
        if !self.state.pending_commit.replace(false) {
            return false;
        }
        let Some(on_commit) = &self.state.on_commit else {
            return false;
        };
        debug!(target: LOG_TARGET, ?event, "commit delivered");
        on_commit(event);
        true
    }

    #[must_use]
    pub fn contract(&self) -> &C {
        &self.state.contract
    }
}

impl<C: InputContract> fmt::Debug for SyncController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncController")
            .field("text_len", &self.state.raw.with_untracked(String::len))
            .field("has_value", &self.state.value.with_untracked(|v| v.is_some()))
            .field("invalid", &self.state.invalid.peek())
            .field("pending_commit", &self.state.pending_commit.get())
            .finish()
    }
}
