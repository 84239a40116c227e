#![forbid(unsafe_code)]

//! Tick sources: the host-side cadence behind the registry.
//!
//! The registry only needs three things from whatever drives it at display
//! refresh: start, stop, and an activity query. [`TickSource`] captures
//! that, keeping the pause/resume logic host-agnostic and testable with a
//! fake driven through `handle_tick()` directly.
//!
//! [`ManualTickSource`] is the default: a bare activity flag for hosts that
//! poll the registry from their own loop. [`FrameClock`] adds fixed-interval
//! pacing for hosts that integrate with an event poll, without allocating
//! per tick.

use std::time::{Duration, Instant};

/// A pausable periodic callback source at display-refresh cadence.
///
/// The registry starts the source when its first binding is registered and
/// stops it when the last one is removed. Stopping pauses; it does not
/// destroy the source, which may be started again later.
pub trait TickSource {
    /// Begin (or resume) delivering ticks.
    fn start(&mut self);

    /// Pause tick delivery.
    fn stop(&mut self);

    /// Whether ticks are currently being delivered.
    fn is_active(&self) -> bool;
}

/// The simplest tick source: an activity flag and nothing else.
///
/// Hosts that own their frame loop check `BindingRegistry::is_ticking()`
/// and invoke `handle_tick()` themselves; this source only records whether
/// they should.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualTickSource {
    active: bool,
}

impl ManualTickSource {
    /// Create a paused manual source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickSource for ManualTickSource {
    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Fixed-interval frame pacing for event-loop hosts.
///
/// `poll()` answers "is a tick due now?" and re-arms the deadline when it
/// is; `timeout()` yields the remaining wait, sized for an event poll so
/// the loop wakes exactly when the next frame is due.
///
/// The `_at` variants take an explicit `Instant` so tests control time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    last_tick: Instant,
    active: bool,
}

impl FrameClock {
    /// Create a paused clock with the given frame interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Instant::now(),
            active: false,
        }
    }

    /// Create a paused clock ticking `rate` times per second.
    ///
    /// A rate of zero is clamped to one.
    #[must_use]
    pub fn per_second(rate: u32) -> Self {
        Self::new(Duration::from_secs(1) / rate.max(1))
    }

    /// The configured frame interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a tick is due. Re-arms the deadline when it is.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// `poll()` against an explicit clock reading.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        if self.active && now.saturating_duration_since(self.last_tick) >= self.interval {
            self.last_tick = now;
            return true;
        }
        false
    }

    /// Remaining wait until the next tick is due, for event-poll timeouts.
    ///
    /// Returns the full interval while paused, so an idle host still wakes
    /// at frame cadence to notice state changes.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout_at(Instant::now())
    }

    /// `timeout()` against an explicit clock reading.
    #[must_use]
    pub fn timeout_at(&self, now: Instant) -> Duration {
        if self.active {
            self.interval
                .saturating_sub(now.saturating_duration_since(self.last_tick))
        } else {
            self.interval
        }
    }
}

impl TickSource for FrameClock {
    fn start(&mut self) {
        self.active = true;
        self.last_tick = Instant::now();
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
