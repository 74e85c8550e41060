#![forbid(unsafe_code)]

//! Validity side channels.
//!
//! A [`ValidityReporter`] mirrors one controller's invalid flag into a cell
//! the caller owns. [`FormValidity`] folds several such cells into a single
//! "anything invalid?" flag, e.g. to disable a submit action.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sigform_runtime::{BindingScope, Observable};

/// Writes every recomputed validity flag into an external cell.
///
/// The reporter holds no logic of its own; it only copies.
#[derive(Clone, Default)]
pub struct ValidityReporter {
    target: Option<Observable<bool>>,
}

impl ValidityReporter {
    #[must_use]
    pub fn new(target: Observable<bool>) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// A reporter with nowhere to report to.
    #[must_use]
    pub fn detached() -> Self {
        Self { target: None }
    }

    /// Mirror `invalid` into the target cell, if any.
    pub fn report(&self, invalid: bool) {
        if let Some(target) = &self.target {
            target.set(invalid);
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<&Observable<bool>> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }
}

impl fmt::Debug for ValidityReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidityReporter")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Aggregated validity of a group of inputs.
pub struct FormValidity {
    scope: BindingScope,
    members: Rc<RefCell<Vec<Observable<bool>>>>,
    any_invalid: Observable<bool>,
}

impl FormValidity {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scope: BindingScope::new(),
            members: Rc::new(RefCell::new(Vec::new())),
            any_invalid: Observable::new(false),
        }
    }

    /// Include `flag` in the aggregate.
    pub fn track(&mut self, flag: &Observable<bool>) -> &mut Self {
        self.members.borrow_mut().push(flag.clone());
        let members = Rc::clone(&self.members);
        let any_invalid = self.any_invalid.clone();
        let recompute = move || {
            let invalid = members.borrow().iter().any(Observable::peek);
            any_invalid.set(invalid);
        };
        recompute();
        self.scope.subscribe(flag, move |_| recompute());
        self
    }

    /// Whether any tracked flag is set (tracked read).
    #[must_use]
    pub fn any_invalid(&self) -> bool {
        self.any_invalid.get()
    }

    /// The aggregate cell, for binding or effects.
    #[must_use]
    pub fn observable(&self) -> Observable<bool> {
        self.any_invalid.clone()
    }

    /// Number of tracked flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }
}

impl Default for FormValidity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValidity")
            .field("members", &self.len())
            .field("any_invalid", &self.any_invalid.peek())
            .finish()
    }
}
