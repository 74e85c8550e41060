#![forbid(unsafe_code)]

//! Dependency-tracking frames.
//!
//! A frame is pushed around an effect body; tracked reads inside it record
//! their cell. `untracked` pushes an opaque frame that swallows records.

use std::cell::RefCell;
use std::rc::Rc;

use super::observable::Subscription;

/// A cell an effect can depend on.
pub(crate) trait Dependency {
    /// Identity of the underlying cell, stable while any handle is alive.
    fn key(&self) -> usize;

    /// Current write version of the cell.
    fn version(&self) -> u64;

    /// Subscribe `on_change` to the cell.
    fn watch(&self, on_change: Rc<dyn Fn()>) -> Subscription;
}

/// A dependency plus the cell version seen at its first read.
pub(crate) struct Tracked {
    pub(crate) dependency: Box<dyn Dependency>,
    pub(crate) seen_version: u64,
}

impl Tracked {
    /// Whether the cell was written after the body first read it.
    pub(crate) fn is_stale(&self) -> bool {
        self.dependency.version() != self.seen_version
    }
}

type Frame = Option<Vec<Tracked>>;

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct FrameGuard {
    armed: bool,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        if self.armed {
            FRAMES.with(|frames| {
                frames.borrow_mut().pop();
            });
        }
    }
}

fn push(frame: Frame) -> FrameGuard {
    FRAMES.with(|frames| frames.borrow_mut().push(frame));
    FrameGuard { armed: true }
}

pub(crate) fn is_tracking() -> bool {
    FRAMES.with(|frames| matches!(frames.borrow().last(), Some(Some(_))))
}

pub(crate) fn record(dependency: Box<dyn Dependency>) {
    FRAMES.with(|frames| {
        if let Some(Some(frame)) = frames.borrow_mut().last_mut() {
            let key = dependency.key();
            if !frame.iter().any(|known| known.dependency.key() == key) {
                let seen_version = dependency.version();
                frame.push(Tracked {
                    dependency,
                    seen_version,
                });
            }
        }
    });
}

/// Run `f` in a fresh frame and return what it read.
pub(crate) fn collect<R>(f: impl FnOnce() -> R) -> (R, Vec<Tracked>) {
    let mut guard = push(Some(Vec::new()));
    let result = f();
    guard.armed = false;
    let dependencies = FRAMES
        .with(|frames| frames.borrow_mut().pop())
        .flatten()
        .unwrap_or_default();
    (result, dependencies)
}

/// Run `f` without recording any dependency for the enclosing effect.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _guard = push(None);
    f()
}
