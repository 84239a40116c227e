#![forbid(unsafe_code)]

//! Deterministic fixtures for exercising bindings without a real display.
//!
//! Everything here is shared-handle state (`Rc` internals, cheap clones) so
//! a fixture can live on both sides of a binding closure and in the test
//! body at once:
//!
//! - [`SharedValue`]: a settable current value to use as a source.
//! - [`ScriptedSource`]: a pre-programmed value sequence, one per read.
//! - [`RecordingSink`]: captures every value a sink receives.
//! - [`SharedTickSpy`]: a [`TickSource`](framelink::TickSource) that counts
//!   start/stop transitions, observable through any clone.

pub mod sink;
pub mod source;
pub mod tick_spy;

pub use sink::RecordingSink;
pub use source::{ScriptedSource, SharedValue};
pub use tick_spy::SharedTickSpy;
