#![forbid(unsafe_code)]

//! Scripted field driver.
//!
//! A script is a list of [`Step`]s. Each step is applied to a mounted
//! [`SyncController`] and followed by a [`Frame`] capturing what a host
//! control and business logic would see at that point.
//!
//! ```
//! use sigform_harness::{FieldDriver, Step};
//! use sigform_widgets::AmountContract;
//!
//! let mut driver = FieldDriver::new(AmountContract::new(6));
//! driver.apply(Step::Type("1.50".into()));
//! driver.apply(Step::Refresh(Some(1_500_000u32.into())));
//! assert_eq!(driver.last().text, "1.50");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sigform_runtime::{Observable, OptionalObservable};
use sigform_widgets::{CommitEvent, InputContract, SyncController};

/// One scripted interaction.
pub enum Step<V> {
    /// Replace the control's text.
    Type(String),
    /// Write the value container from business logic.
    Refresh(Option<V>),
    /// Fire a UI commit event.
    Commit(CommitEvent),
    /// Toggle the disabled flag.
    Disable(bool),
}

impl<V> Step<V> {
    fn label(&self) -> String {
        match self {
            Self::Type(text) => format!("type {text:?}"),
            Self::Refresh(Some(_)) => "refresh some".to_string(),
            Self::Refresh(None) => "refresh none".to_string(),
            Self::Commit(event) => format!("commit {event:?}"),
            Self::Disable(flag) => format!("disable {flag}"),
        }
    }
}

impl<V> fmt::Debug for Step<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Observable state after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub step: String,
    pub text: String,
    /// The held value, rendered through the contract; `None` when absent.
    pub value: Option<String>,
    pub invalid: bool,
    pub pending_commit: bool,
    /// Whether this step delivered a commit.
    pub committed: bool,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} text={:?} value={} invalid={} pending={}",
            self.step,
            self.text,
            self.value.as_deref().unwrap_or("-"),
            self.invalid,
            self.pending_commit,
        )?;
        if self.committed {
            f.write_str(" committed")?;
        }
        Ok(())
    }
}

/// Drives one mounted field through a script.
pub struct FieldDriver<C: InputContract> {
    controller: SyncController<C>,
    disabled: Observable<bool>,
    commits: Rc<RefCell<Vec<CommitEvent>>>,
    transcript: Vec<Frame>,
}

impl<C: InputContract> FieldDriver<C> {
    /// Mount `contract` over an empty value container.
    pub fn new(contract: C) -> Self {
        Self::with_value(contract, OptionalObservable::empty())
    }

    /// Mount `contract` over an existing container.
    pub fn with_value(contract: C, value: OptionalObservable<C::Value>) -> Self {
        let disabled = Observable::new(false);
        let commits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&commits);
        let controller = SyncController::builder(contract, value)
            .disabled(disabled.clone())
            .on_commit(move |event| sink.borrow_mut().push(event))
            .mount();
        let mut driver = Self {
            controller,
            disabled,
            commits,
            transcript: Vec::new(),
        };
        driver.record("mount".to_string(), false);
        driver
    }

    /// Apply one step and record its frame.
    pub fn apply(&mut self, step: Step<C::Value>) -> &Frame {
        let label = step.label();
        let committed = match step {
            Step::Type(text) => {
                self.controller.input(text);
                false
            }
            Step::Refresh(value) => {
                self.controller.value().write(value);
                false
            }
            Step::Commit(event) => self.controller.flush_commit(event),
            Step::Disable(flag) => {
                self.disabled.set(flag);
                false
            }
        };
        self.record(label, committed)
    }

    /// Apply every step in order.
    pub fn run(&mut self, steps: impl IntoIterator<Item = Step<C::Value>>) -> &[Frame] {
        let start = self.transcript.len();
        for step in steps {
            self.apply(step);
        }
        &self.transcript[start..]
    }

    /// Frames so far, starting with the one taken at mount.
    #[must_use]
    pub fn transcript(&self) -> &[Frame] {
        &self.transcript
    }

    /// The latest frame.
    #[must_use]
    pub fn last(&self) -> &Frame {
        // `with_value` records the mount frame, so the transcript is never empty.
        &self.transcript[self.transcript.len() - 1]
    }

    /// Transcript as one line per frame.
    #[must_use]
    pub fn render_transcript(&self) -> String {
        self.transcript
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Commit events delivered to `on_commit`, in order.
    #[must_use]
    pub fn commits(&self) -> Vec<CommitEvent> {
        self.commits.borrow().clone()
    }

    #[must_use]
    pub fn controller(&self) -> &SyncController<C> {
        &self.controller
    }

    #[must_use]
    pub fn value(&self) -> &OptionalObservable<C::Value> {
        self.controller.value()
    }

    fn record(&mut self, step: String, committed: bool) -> &Frame {
        let controller = &self.controller;
        let value = controller.value().with_untracked(|held| {
            held.map(|v| controller.contract().serialize(Some(v)))
        });
        self.transcript.push(Frame {
            step,
            text: controller.raw_text_observable().peek(),
            value,
            invalid: controller.invalid_observable().peek(),
            pending_commit: controller.has_pending_commit(),
            committed,
        });
        self.last()
    }
}

impl<C: InputContract> fmt::Debug for FieldDriver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDriver")
            .field("frames", &self.transcript.len())
            .field("controller", &self.controller)
            .finish()
    }
}
