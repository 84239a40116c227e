#![forbid(unsafe_code)]

//! Convenience entry points against a shared, thread-local registry.
//!
//! The simplest usage is `bind(source, sink)`: construct a binding, hand it
//! to the shared registry, keep the returned handle if you ever want to
//! [`unbind`]. The shared instance is created on first use and lives for
//! the thread's lifetime — for the UI thread that drives frames, that is
//! the process-wide registry. It is an explicit default, not a hidden
//! global: callers needing isolation construct their own
//! [`BindingRegistry`] and drive `handle_tick()` themselves.
//!
//! `bind` is change-detecting and therefore asks `T: Clone + PartialEq`;
//! value types without equality use [`bind_every_frame`] instead. The
//! strategy choice is per entry point rather than per overload, which is
//! how the equality capability is selected at compile time in Rust.

use crate::binding::BindingHandle;
use crate::registry::BindingRegistry;

thread_local! {
    static SHARED_REGISTRY: BindingRegistry = BindingRegistry::new();
}

/// Run `f` with the shared registry for this thread.
///
/// Hosts use this to drive ticks (`registry.handle_tick()`) and check
/// whether ticking is needed at all (`registry.is_ticking()`).
pub fn with_shared_registry<R>(f: impl FnOnce(&BindingRegistry) -> R) -> R {
    SHARED_REGISTRY.with(f)
}

/// Keep `sink` in sync with `source`, writing only new values.
///
/// Registers against the shared registry and returns the removal handle.
pub fn bind<T, S, F>(source: S, sink: F) -> BindingHandle
where
    T: Clone + PartialEq + 'static,
    S: Fn() -> T + 'static,
    F: FnMut(T) + 'static,
{
    bind_new_values(source, sink)
}

/// Keep `sink` in sync with `source`, writing every frame.
pub fn bind_every_frame<T, S, F>(source: S, sink: F) -> BindingHandle
where
    T: 'static,
    S: Fn() -> T + 'static,
    F: FnMut(T) + 'static,
{
    with_shared_registry(|registry| registry.bind_every_frame(source, sink))
}

/// Keep `sink` in sync with `source`, writing only when the value changes.
///
/// The first tick after registration always writes once, establishing
/// initial state.
pub fn bind_new_values<T, S, F>(source: S, sink: F) -> BindingHandle
where
    T: Clone + PartialEq + 'static,
    S: Fn() -> T + 'static,
    F: FnMut(T) + 'static,
{
    with_shared_registry(|registry| registry.bind_new_values(source, sink))
}

/// Remove a binding from the shared registry.
///
/// No-op if the handle was never registered there (or already removed).
pub fn unbind(binding: &BindingHandle) {
    with_shared_registry(|registry| registry.remove_binding(binding));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
//
// Each test runs on its own thread, so each sees a fresh shared registry.
