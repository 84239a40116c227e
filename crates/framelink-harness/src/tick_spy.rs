#![forbid(unsafe_code)]

//! A tick source that records its lifecycle transitions.

use std::cell::Cell;
use std::rc::Rc;

use framelink::TickSource;

struct SpyState {
    active: Cell<bool>,
    starts: Cell<u32>,
    stops: Cell<u32>,
}

/// A [`TickSource`] whose transitions are observable through any clone.
///
/// Hand one clone to `BindingRegistry::with_tick_source` and keep another
/// to assert on pause/resume behavior.
pub struct SharedTickSpy {
    state: Rc<SpyState>,
}

impl SharedTickSpy {
    /// Create an inactive spy with zeroed counters.
    pub fn new() -> Self {
        Self {
            state: Rc::new(SpyState {
                active: Cell::new(false),
                starts: Cell::new(0),
                stops: Cell::new(0),
            }),
        }
    }

    /// Whether the source is currently started.
    pub fn is_active(&self) -> bool {
        self.state.active.get()
    }

    /// Number of start transitions observed.
    pub fn starts(&self) -> u32 {
        self.state.starts.get()
    }

    /// Number of stop transitions observed.
    pub fn stops(&self) -> u32 {
        self.state.stops.get()
    }
}

impl TickSource for SharedTickSpy {
    fn start(&mut self) {
        self.state.active.set(true);
        self.state.starts.set(self.state.starts.get() + 1);
    }

    fn stop(&mut self) {
        self.state.active.set(false);
        self.state.stops.set(self.state.stops.get() + 1);
    }

    fn is_active(&self) -> bool {
        self.state.active.get()
    }
}

impl Default for SharedTickSpy {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SharedTickSpy {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl std::fmt::Debug for SharedTickSpy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTickSpy")
            .field("active", &self.state.active.get())
            .field("starts", &self.state.starts.get())
            .field("stops", &self.state.stops.get())
            .finish()
    }
}
