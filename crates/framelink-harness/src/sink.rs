#![forbid(unsafe_code)]

//! Sink-side fixtures.

use std::cell::RefCell;
use std::rc::Rc;

/// Captures every value a sink receives.
///
/// Clones share the same log, so the test body inspects what the binding's
/// sink closure recorded.
pub struct RecordingSink<T> {
    received: Rc<RefCell<Vec<T>>>,
}

impl<T: 'static> RecordingSink<T> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            received: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A sink closure recording into this fixture.
    pub fn sink(&self) -> impl FnMut(T) + 'static {
        let received = Rc::clone(&self.received);
        move |value| received.borrow_mut().push(value)
    }

    /// How many times the sink has been invoked.
    pub fn call_count(&self) -> usize {
        self.received.borrow().len()
    }

    /// All recorded values, in arrival order.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.received.borrow().clone()
    }

    /// The most recently recorded value, if any.
    pub fn last(&self) -> Option<T>
    where
        T: Clone,
    {
        self.received.borrow().last().cloned()
    }
}

impl<T: 'static> Default for RecordingSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordingSink<T> {
    fn clone(&self) -> Self {
        Self {
            received: Rc::clone(&self.received),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RecordingSink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSink")
            .field("call_count", &self.received.borrow().len())
            .finish()
    }
}
