#![forbid(unsafe_code)]

//! Source-side fixtures.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A settable value to bind sources against.
///
/// Clones share the same cell, so the test body mutates what the binding's
/// source closure reads.
pub struct SharedValue<T> {
    inner: Rc<RefCell<T>>,
}

impl<T: Clone + 'static> SharedValue<T> {
    /// Create a shared value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.inner.borrow().clone()
    }

    /// Replace the current value.
    pub fn set(&self, value: T) {
        *self.inner.borrow_mut() = value;
    }

    /// A source closure reading this value.
    pub fn source(&self) -> impl Fn() -> T + 'static {
        let inner = Rc::clone(&self.inner);
        move || inner.borrow().clone()
    }
}

impl<T> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SharedValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedValue")
            .field("value", &self.inner.borrow())
            .finish()
    }
}

/// A pre-programmed sequence of source values.
///
/// Each read consumes the next scripted value; once the script runs out,
/// the last value repeats (a source must always produce something).
pub struct ScriptedSource<T> {
    inner: Rc<RefCell<ScriptState<T>>>,
}

struct ScriptState<T> {
    pending: VecDeque<T>,
    last: Option<T>,
}

impl<T: Clone + 'static> ScriptedSource<T> {
    /// Script the given values, in order.
    pub fn new(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScriptState {
                pending: values.into_iter().collect(),
                last: None,
            })),
        }
    }

    /// Read the next value (or repeat the final one).
    ///
    /// # Panics
    ///
    /// Panics when reading an empty script that has never produced a value.
    pub fn read(&self) -> T {
        let mut state = self.inner.borrow_mut();
        match state.pending.pop_front() {
            Some(next) => {
                state.last = Some(next.clone());
                next
            }
            None => state
                .last
                .clone()
                .expect("scripted source read before any value was scripted"),
        }
    }

    /// Values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// A source closure reading this script.
    pub fn source(&self) -> impl Fn() -> T + 'static {
        let script = self.clone();
        move || script.read()
    }
}

impl<T> Clone for ScriptedSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ScriptedSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedSource")
            .field("remaining", &self.inner.borrow().pending.len())
            .finish_non_exhaustive()
    }
}
