#![forbid(unsafe_code)]

//! Display-refresh data bindings: keep sinks in sync with sources.
//!
//! Framelink lets a caller declare "keep sink in sync with source"
//! relationships and resolves all of them once per display-refresh tick,
//! skipping redundant writes when the source value has not changed (for
//! comparable value types). There is very little overhead, but bound code
//! can run every frame — keep sources and sinks snappy.
//!
//! The simplest usage is [`bind`]:
//!
//! ```
//! use framelink::{bind, with_shared_registry};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let position = Rc::new(Cell::new((0i32, 0i32)));
//! let center = Rc::new(Cell::new((0i32, 0i32)));
//!
//! let model = Rc::clone(&position);
//! let view = Rc::clone(&center);
//! bind(move || model.get(), move |p| view.set(p));
//!
//! // The host drives one tick per display refresh; tests drive it directly.
//! with_shared_registry(|registry| registry.handle_tick());
//! assert_eq!(center.get(), (0, 0));
//! ```
//!
//! If the bound type is comparable, [`bind`] only writes when the value
//! changes. To write every frame regardless, call [`bind_every_frame`]; to
//! ask for change detection explicitly, call [`bind_new_values`].
//!
//! # Primary responsibilities
//!
//! - **Binding strategies**: always-apply vs. apply-on-change
//!   ([`EveryFrameBinding`], [`NewValuesBinding`]).
//! - **Scheduling**: [`BindingRegistry`] applies the live set in
//!   registration order once per tick, and pauses its tick source while no
//!   bindings are registered.
//! - **Host integration**: [`TickSource`] abstracts the display-refresh
//!   callback; [`FrameClock`] paces event-loop hosts.
//!
//! # Concurrency model
//!
//! Single-threaded cooperative. Everything runs on the thread that drives
//! frames; the types are `!Send` by construction, so cross-thread use
//! fails to compile rather than racing.

pub mod binding;
pub mod facade;
pub mod registry;
pub mod tick;

pub use binding::{Binding, BindingHandle, EveryFrameBinding, NewValuesBinding};
pub use facade::{bind, bind_every_frame, bind_new_values, unbind, with_shared_registry};
pub use registry::BindingRegistry;
pub use tick::{FrameClock, ManualTickSource, TickSource};
