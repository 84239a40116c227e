#![forbid(unsafe_code)]

//! The binding registry: holds the live binding set and applies it per tick.
//!
//! # Design
//!
//! [`BindingRegistry`] owns an ordered sequence of [`BindingHandle`]s and
//! one lazily-created [`TickSource`]. Interior mutability (`RefCell`) lets a
//! shared instance be driven through `&self`, the same single-threaded
//! confinement the binding layer uses. The tick source is constructed from
//! a stored factory the first time a binding is added, then started and
//! stopped as the sequence becomes non-empty and empty; an empty registry
//! costs no ticks.
//!
//! `handle_tick()` snapshots the sequence before iterating and re-checks
//! membership immediately before each apply, so structural changes made
//! from inside a sink never corrupt iteration: an entry removed mid-tick
//! does not fire later in that same tick, and an entry added mid-tick first
//! fires on the next tick.
//!
//! # Invariants
//!
//! 1. After any `add_binding`/`remove_binding` call returns, the tick
//!    source is active iff the sequence is non-empty.
//! 2. Bindings apply in registration order, front to back.
//! 3. Duplicate handles occupy one slot per add and apply once per slot;
//!    removal drops every occurrence.
//! 4. Dropping the registry stops the tick source; no further ticks occur.
//!
//! # Failure Modes
//!
//! - Sink/source panic: propagates out of `handle_tick()`; the registry's
//!   list is untouched but the panicking tick is abandoned part-way.
//! - Re-entrant `add_binding`/`remove_binding` from inside a sink is
//!   supported; re-entrant `handle_tick` from inside a sink applies the
//!   same snapshot again and is not useful, but does not panic for
//!   non-overlapping bindings.

use std::cell::RefCell;

use tracing::{debug, trace};

use crate::binding::{BindingHandle, EveryFrameBinding, NewValuesBinding};
use crate::tick::{ManualTickSource, TickSource};

struct RegistryInner {
    bindings: Vec<BindingHandle>,
    ticker: Option<Box<dyn TickSource>>,
    make_ticker: Box<dyn Fn() -> Box<dyn TickSource>>,
}

/// Ordered set of live bindings plus the tick source that drives them.
pub struct BindingRegistry {
    inner: RefCell<RegistryInner>,
}

impl BindingRegistry {
    /// Create an empty registry with a [`ManualTickSource`].
    ///
    /// The source is not constructed until the first binding is added.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tick_source(ManualTickSource::new)
    }

    /// Create an empty registry whose tick source comes from `factory`.
    ///
    /// The factory runs once, on the first `add_binding` call; the
    /// resulting source is then reused for the registry's lifetime.
    pub fn with_tick_source<S, F>(factory: F) -> Self
    where
        S: TickSource + 'static,
        F: Fn() -> S + 'static,
    {
        Self {
            inner: RefCell::new(RegistryInner {
                bindings: Vec::new(),
                ticker: None,
                make_ticker: Box::new(move || Box::new(factory())),
            }),
        }
    }

    /// Append a binding to the tick order.
    ///
    /// The same handle may be added more than once; it will apply once per
    /// occurrence.
    pub fn add_binding(&self, binding: BindingHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.bindings.push(binding);
        debug!(bindings = inner.bindings.len(), "binding added");
        Self::sync_tick_source(&mut inner);
    }

    /// Remove every occurrence of the handle's binding, by identity.
    ///
    /// Unregistered handles are a no-op.
    pub fn remove_binding(&self, binding: &BindingHandle) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.bindings.len();
        inner.bindings.retain(|held| !held.ptr_eq(binding));
        if inner.bindings.len() != before {
            debug!(bindings = inner.bindings.len(), "binding removed");
            Self::sync_tick_source(&mut inner);
        }
    }

    /// Construct, register, and return an always-apply binding.
    pub fn bind_every_frame<T, S, F>(&self, source: S, sink: F) -> BindingHandle
    where
        T: 'static,
        S: Fn() -> T + 'static,
        F: FnMut(T) + 'static,
    {
        let handle = BindingHandle::new(EveryFrameBinding::new(source, sink));
        self.add_binding(handle.clone());
        handle
    }

    /// Construct, register, and return a change-detecting binding.
    pub fn bind_new_values<T, S, F>(&self, source: S, sink: F) -> BindingHandle
    where
        T: Clone + PartialEq + 'static,
        S: Fn() -> T + 'static,
        F: FnMut(T) + 'static,
    {
        let handle = BindingHandle::new(NewValuesBinding::new(source, sink));
        self.add_binding(handle.clone());
        handle
    }

    /// Apply every registered binding once, in registration order.
    ///
    /// Invoked by the host once per display refresh; exposed publicly so
    /// test harnesses can drive ticks synchronously without a display.
    /// A tick with no bindings is a no-op.
    pub fn handle_tick(&self) {
        let snapshot = self.inner.borrow().bindings.clone();
        if snapshot.is_empty() {
            return;
        }
        trace!(bindings = snapshot.len(), "tick");
        for binding in &snapshot {
            // Entries removed earlier in this same tick must not fire.
            let registered = self
                .inner
                .borrow()
                .bindings
                .iter()
                .any(|held| held.ptr_eq(binding));
            if registered {
                binding.apply();
            }
        }
    }

    /// Number of registered bindings (duplicates counted per occurrence).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().bindings.len()
    }

    /// Whether no bindings are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().bindings.is_empty()
    }

    /// Whether the tick source exists and is active.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.inner
            .borrow()
            .ticker
            .as_ref()
            .is_some_and(|source| source.is_active())
    }

    /// Start or stop the tick source to match the binding count.
    fn sync_tick_source(inner: &mut RegistryInner) {
        let RegistryInner {
            bindings,
            ticker,
            make_ticker,
        } = inner;
        if bindings.is_empty() {
            if let Some(source) = ticker.as_mut()
                && source.is_active()
            {
                source.stop();
                debug!("tick source paused");
            }
        } else {
            let source = ticker.get_or_insert_with(|| make_ticker());
            if !source.is_active() {
                source.start();
                debug!("tick source started");
            }
        }
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("BindingRegistry")
            .field("bindings", &inner.bindings.len())
            .field(
                "ticking",
                &inner.ticker.as_ref().is_some_and(|s| s.is_active()),
            )
            .finish()
    }
}

impl Drop for BindingRegistry {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        if let Some(source) = inner.ticker.as_mut()
            && source.is_active()
        {
            source.stop();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Tick source that mirrors its transitions into shared cells.
    #[derive(Clone)]
    struct ProbeTickSource {
        active: Rc<Cell<bool>>,
        starts: Rc<Cell<u32>>,
        stops: Rc<Cell<u32>>,
    }

    impl ProbeTickSource {
        fn new() -> Self {
            Self {
                active: Rc::new(Cell::new(false)),
                starts: Rc::new(Cell::new(0)),
                stops: Rc::new(Cell::new(0)),
            }
        }
    }

    impl TickSource for ProbeTickSource {
        fn start(&mut self) {
            self.active.set(true);
            self.starts.set(self.starts.get() + 1);
        }

        fn stop(&mut self) {
            self.active.set(false);
            self.stops.set(self.stops.get() + 1);
        }

        fn is_active(&self) -> bool {
            self.active.get()
        }
    }

    fn probed_registry() -> (BindingRegistry, ProbeTickSource) {
        let probe = ProbeTickSource::new();
        let factory_probe = probe.clone();
        let registry = BindingRegistry::with_tick_source(move || factory_probe.clone());
        (registry, probe)
    }

    #[test]
    fn starts_empty_and_paused() {
        let registry = BindingRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(!registry.is_ticking());
    }

    #[test]
    fn add_starts_tick_source() {
        let registry = BindingRegistry::new();
        registry.bind_every_frame(|| 1, |_| {});
        assert_eq!(registry.len(), 1);
        assert!(registry.is_ticking());
    }

    #[test]
    fn removing_last_binding_pauses() {
        let registry = BindingRegistry::new();
        let handle = registry.bind_every_frame(|| 1, |_| {});
        registry.remove_binding(&handle);
        assert!(registry.is_empty());
        assert!(!registry.is_ticking());
    }

    #[test]
    fn remove_keeps_ticking_while_nonempty() {
        let registry = BindingRegistry::new();
        let first = registry.bind_every_frame(|| 1, |_| {});
        let _second = registry.bind_every_frame(|| 2, |_| {});
        registry.remove_binding(&first);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_ticking());
    }

    #[test]
    fn tick_source_constructed_lazily() {
        let (registry, probe) = probed_registry();
        assert_eq!(probe.starts.get(), 0);

        registry.bind_every_frame(|| 1, |_| {});
        assert_eq!(probe.starts.get(), 1);
    }

    #[test]
    fn pause_resume_transitions_counted() {
        let (registry, probe) = probed_registry();
        let handle = registry.bind_every_frame(|| 1, |_| {});
        registry.remove_binding(&handle);
        let again = registry.bind_every_frame(|| 1, |_| {});
        registry.remove_binding(&again);

        assert_eq!(probe.starts.get(), 2);
        assert_eq!(probe.stops.get(), 2);
    }

    #[test]
    fn drop_stops_tick_source() {
        let (registry, probe) = probed_registry();
        registry.bind_every_frame(|| 1, |_| {});
        assert!(probe.active.get());

        drop(registry);
        assert!(!probe.active.get());
        assert_eq!(probe.stops.get(), 1);
    }

    #[test]
    fn tick_applies_in_registration_order() {
        let registry = BindingRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = Rc::clone(&log);
        registry.bind_every_frame(|| (), move |()| log_a.borrow_mut().push('A'));
        let log_b = Rc::clone(&log);
        registry.bind_every_frame(|| (), move |()| log_b.borrow_mut().push('B'));

        registry.handle_tick();
        assert_eq!(*log.borrow(), vec!['A', 'B']);
    }

    #[test]
    fn empty_tick_is_noop() {
        let registry = BindingRegistry::new();
        registry.handle_tick();
        assert!(registry.is_empty());
    }

    #[test]
    fn removed_binding_does_not_fire() {
        let registry = BindingRegistry::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);

        let handle = registry.bind_every_frame(|| (), move |()| {
            count_clone.set(count_clone.get() + 1);
        });
        registry.handle_tick();
        registry.remove_binding(&handle);
        registry.handle_tick();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn remove_unregistered_is_noop() {
        let registry = BindingRegistry::new();
        registry.bind_every_frame(|| 1, |_| {});

        let stranger = BindingHandle::new(EveryFrameBinding::new(|| 1, |_| {}));
        registry.remove_binding(&stranger);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_ticking());
    }

    #[test]
    fn duplicate_add_applies_per_occurrence() {
        let registry = BindingRegistry::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);

        let handle = BindingHandle::new(EveryFrameBinding::new(|| (), move |()| {
            count_clone.set(count_clone.get() + 1);
        }));
        registry.add_binding(handle.clone());
        registry.add_binding(handle.clone());

        registry.handle_tick();
        assert_eq!(count.get(), 2);

        // Removal drops every occurrence.
        registry.remove_binding(&handle);
        assert!(registry.is_empty());
        assert!(!registry.is_ticking());
    }

    #[test]
    fn change_detection_across_ticks() {
        let registry = BindingRegistry::new();
        let recorded = Rc::new(Cell::new(0));
        let calls = Rc::new(Cell::new(0u32));
        let recorded_clone = Rc::clone(&recorded);
        let calls_clone = Rc::clone(&calls);

        registry.bind_new_values(|| 10, move |v| {
            recorded_clone.set(v);
            calls_clone.set(calls_clone.get() + 1);
        });

        registry.handle_tick();
        assert_eq!(recorded.get(), 10);

        registry.handle_tick();
        assert_eq!(recorded.get(), 10);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn mid_tick_removal_suppresses_later_binding() {
        // The first binding unbinds the second from inside its own sink;
        // the second must not fire during that tick.
        let registry = Rc::new(BindingRegistry::new());
        let count = Rc::new(Cell::new(0u32));

        let count_clone = Rc::clone(&count);
        let victim = BindingHandle::new(EveryFrameBinding::new(|| (), move |()| {
            count_clone.set(count_clone.get() + 1);
        }));

        let registry_clone = Rc::clone(&registry);
        let victim_clone = victim.clone();
        registry.bind_every_frame(|| (), move |()| {
            registry_clone.remove_binding(&victim_clone);
        });
        registry.add_binding(victim.clone());

        registry.handle_tick();
        assert_eq!(count.get(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn mid_tick_add_waits_for_next_tick() {
        let registry = Rc::new(BindingRegistry::new());
        let count = Rc::new(Cell::new(0u32));

        let registry_clone = Rc::clone(&registry);
        let count_clone = Rc::clone(&count);
        let added = Rc::new(Cell::new(false));
        let added_clone = Rc::clone(&added);
        registry.bind_every_frame(|| (), move |()| {
            if !added_clone.get() {
                added_clone.set(true);
                let inner_count = Rc::clone(&count_clone);
                registry_clone.bind_every_frame(|| (), move |()| {
                    inner_count.set(inner_count.get() + 1);
                });
            }
        });

        registry.handle_tick();
        assert_eq!(count.get(), 0, "added mid-tick, fires next tick");

        registry.handle_tick();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn debug_format() {
        let registry = BindingRegistry::new();
        registry.bind_every_frame(|| 1, |_| {});
        let debug = format!("{registry:?}");
        assert!(debug.contains("bindings: 1"));
        assert!(debug.contains("ticking: true"));
    }
}
