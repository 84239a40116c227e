#![forbid(unsafe_code)]

//! Binding strategies: the unit of work the registry applies once per tick.
//!
//! A binding copies one value from a source closure to a sink closure when
//! applied. Two strategies exist:
//!
//! - [`EveryFrameBinding<T>`]: reads and writes on every apply.
//! - [`NewValuesBinding<T>`]: reads on every apply but writes only when the
//!   value differs from the previously observed one (the first apply always
//!   writes, establishing initial state).
//!
//! [`BindingHandle`] type-erases either strategy behind shared ownership so
//! the registry and the caller can both hold the same binding; the caller's
//! copy doubles as the removal key (identity, not value).
//!
//! # Design
//!
//! Single-threaded sharing via `Rc<RefCell<..>>`, the same confinement model
//! as the rest of the crate. Strategy selection happens at construction
//! time; dispatch afterwards is a flat trait object, no hierarchy.
//!
//! # Invariants
//!
//! 1. `EveryFrameBinding::apply()` invokes source then sink, exactly once
//!    each, every call.
//! 2. `NewValuesBinding::apply()` invokes the source exactly once per call;
//!    the sink runs iff no previous value is recorded or the new value is
//!    unequal to it.
//! 3. After every `NewValuesBinding::apply()`, the just-read value is the
//!    recorded previous value, whether or not the sink ran.
//! 4. Cloning a `BindingHandle` aliases the same binding; `ptr_eq` is true
//!    exactly for aliases.
//!
//! # Failure Modes
//!
//! - Source or sink panic: propagates to the caller of `apply()`. Nothing
//!   is caught at this level.
//! - A handle kept after removal from every registry still works when
//!   applied directly; it just no longer ticks.

use std::cell::RefCell;
use std::rc::Rc;

/// A unit of synchronization work.
///
/// `apply()` performs one step: zero or one sink invocation carrying the
/// source's current result. Safe to call repeatedly and indefinitely.
pub trait Binding {
    /// Perform one synchronization step.
    fn apply(&mut self);
}

/// A binding that forwards the source value to the sink on every apply.
///
/// Use this when the value type has no equality capability, or when
/// per-frame application is wanted regardless of change.
pub struct EveryFrameBinding<T> {
    source: Box<dyn Fn() -> T>,
    sink: Box<dyn FnMut(T)>,
}

impl<T> EveryFrameBinding<T> {
    /// Create a binding from a source and sink pair.
    ///
    /// Both closures are stored as given; nothing is validated or invoked
    /// until the first `apply()`.
    pub fn new(source: impl Fn() -> T + 'static, sink: impl FnMut(T) + 'static) -> Self {
        Self {
            source: Box::new(source),
            sink: Box::new(sink),
        }
    }
}

impl<T> Binding for EveryFrameBinding<T> {
    fn apply(&mut self) {
        (self.sink)((self.source)());
    }
}

impl<T> std::fmt::Debug for EveryFrameBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EveryFrameBinding").finish_non_exhaustive()
    }
}

/// A binding that forwards only values that differ from the last one seen.
///
/// The first apply always fires (there is no previous value yet). The
/// registry runs at display-refresh cadence and most sources are unchanged
/// most ticks, so skipping redundant sink writes avoids wasted downstream
/// work such as layout recalculation.
///
/// The sink consumes the value while a copy is retained for the next
/// comparison, hence the `Clone` bound.
pub struct NewValuesBinding<T: Clone + PartialEq> {
    source: Box<dyn Fn() -> T>,
    sink: Box<dyn FnMut(T)>,
    last_value: Option<T>,
}

impl<T: Clone + PartialEq> NewValuesBinding<T> {
    /// Create a change-detecting binding from a source and sink pair.
    pub fn new(source: impl Fn() -> T + 'static, sink: impl FnMut(T) + 'static) -> Self {
        Self {
            source: Box::new(source),
            sink: Box::new(sink),
            last_value: None,
        }
    }
}

impl<T: Clone + PartialEq> Binding for NewValuesBinding<T> {
    fn apply(&mut self) {
        let value = (self.source)();
        if self.last_value.as_ref() != Some(&value) {
            self.last_value = Some(value.clone());
            (self.sink)(value);
        } else {
            // Unchanged: still record the fresh read, skip the write.
            self.last_value = Some(value);
        }
    }
}

impl<T: Clone + PartialEq> std::fmt::Debug for NewValuesBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewValuesBinding")
            .field("has_last_value", &self.last_value.is_some())
            .finish_non_exhaustive()
    }
}

/// Shared handle to a type-erased binding.
///
/// The registry holds one clone for ticking; the caller keeps another as
/// the removal key. The binding lives as long as its longest holder.
pub struct BindingHandle {
    inner: Rc<RefCell<dyn Binding>>,
}

impl BindingHandle {
    /// Wrap a binding in a shared handle.
    pub fn new(binding: impl Binding + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(binding)),
        }
    }

    /// Apply the underlying binding once.
    pub fn apply(&self) {
        self.inner.borrow_mut().apply();
    }

    /// Whether two handles alias the same binding.
    ///
    /// This is the identity used for removal: value-equal but distinct
    /// bindings never compare equal.
    #[must_use]
    pub fn ptr_eq(&self, other: &BindingHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// Manual Clone: shares the same Rc.
impl Clone for BindingHandle {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for BindingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingHandle").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
