use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.nanos.fetch_add(duration_nanos(dt), Ordering::SeqCst);
    }

    /// Jump to `t`. Moving backwards is allowed (tests use it to model clock skew).
    pub fn set(&self, t: Duration) {
        self.nanos.store(duration_nanos(t), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Source of refresh ticks driving [`crate::PlaybackController::run`].
pub trait TickSource {
    /// Block until the next tick. `None` ends the run.
    fn next_tick(&mut self) -> Option<Duration>;
}

/// Realtime ticks: sleeps so ticks land on a fixed refresh interval.
#[derive(Debug)]
pub struct IntervalTicks {
    interval: Duration,
    next: Instant,
    remaining: Option<u64>,
}

impl IntervalTicks {
    /// Tick every `interval`, forever.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now(),
            remaining: None,
        }
    }

    /// Tick at `hz` refreshes per second (clamped to at least 1).
    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }

    /// Stop after `n` ticks.
    pub fn limit(mut self, n: u64) -> Self {
        self.remaining = Some(n);
        self
    }
}

impl TickSource for IntervalTicks {
    fn next_tick(&mut self) -> Option<Duration> {
        if let Some(n) = self.remaining.as_mut() {
            if *n == 0 {
                return None;
            }
            *n -= 1;
        }
        self.next += self.interval;
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        } else {
            // Fell behind: re-align instead of bursting to catch up.
            self.next = now;
        }
        Some(self.interval)
    }
}

/// Deterministic ticks: each tick advances a [`ManualClock`] by a fixed step without sleeping.
#[derive(Debug)]
pub struct VirtualTicks {
    clock: ManualClock,
    step: Duration,
    remaining: Option<u64>,
}

impl VirtualTicks {
    /// Advance `clock` by `step` per tick, forever.
    pub fn new(clock: ManualClock, step: Duration) -> Self {
        Self {
            clock,
            step,
            remaining: None,
        }
    }

    /// Stop after `n` ticks.
    pub fn limit(mut self, n: u64) -> Self {
        self.remaining = Some(n);
        self
    }
}

impl TickSource for VirtualTicks {
    fn next_tick(&mut self) -> Option<Duration> {
        if let Some(n) = self.remaining.as_mut() {
            if *n == 0 {
                return None;
            }
            *n -= 1;
        }
        self.clock.advance(self.step);
        Some(self.clock.now())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
