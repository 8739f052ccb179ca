//! Clock implementations for simulated time

use std::time::{Duration, Instant};

use tickboard_core::Tick;

/// Clock configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ClockConfig {
    /// Fixed tick rate
    pub ticks_per_second: f64,
    /// Upper bound on ticks produced by a single update
    pub max_ticks_per_update: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            ticks_per_second: 10.0,
            max_ticks_per_update: 5,
        }
    }
}

/// Ticks produced by one clock update, yielded in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickAdvance {
    next: Tick,
    remaining: u32,
    /// Whole ticks dropped because they exceeded the catch-up cap
    pub discarded: u64,
}

impl TickAdvance {
    fn new(first: Tick, count: u32, discarded: u64) -> Self {
        TickAdvance {
            next: first,
            remaining: count,
            discarded,
        }
    }

    pub fn none() -> Self {
        TickAdvance::new(Tick::ZERO, 0, 0)
    }
}

impl Iterator for TickAdvance {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.remaining == 0 {
            return None;
        }
        let tick = self.next;
        self.next = tick.next();
        self.remaining -= 1;
        Some(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for TickAdvance {}

/// Fixed-rate tick clock
/// INVARIANT: the tick counter only moves forward, one step per yielded tick
pub struct TickClock {
    /// Last tick reached
    now: Tick,
    /// Configuration
    config: ClockConfig,
    /// Wall-clock to sim-time multiplier (0 = frozen)
    speed: f64,
    /// Fractional ticks not yet yielded
    accumulated: f64,
}

impl TickClock {
    /// Create a new clock at tick zero
    pub fn new(config: ClockConfig) -> Self {
        let config = if config.ticks_per_second.is_finite() && config.ticks_per_second > 0.0 {
            config
        } else {
            tracing::warn!(
                ticks_per_second = config.ticks_per_second,
                "invalid tick rate, falling back to default"
            );
            ClockConfig {
                ticks_per_second: ClockConfig::default().ticks_per_second,
                ..config
            }
        };
        TickClock {
            now: Tick::ZERO,
            config,
            speed: 1.0,
            accumulated: 0.0,
        }
    }

    /// Current tick
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Get current speed multiplier
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set speed multiplier, clamped to >= 0 (0 freezes the clock)
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    /// Is the clock currently frozen?
    pub fn is_paused(&self) -> bool {
        self.speed == 0.0
    }

    /// Length of one tick in seconds
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.config.ticks_per_second
    }

    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * self.tick_seconds()
    }

    /// Whole ticks covered by `seconds` (rounded down)
    pub fn seconds_to_ticks(&self, seconds: f64) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        (seconds * self.config.ticks_per_second).floor() as u64
    }

    /// Convert elapsed wall-clock time into whole ticks
    ///
    /// At most `max_ticks_per_update` ticks are produced; any surplus beyond
    /// the cap is dropped, never queued for the next update.
    pub fn update(&mut self, elapsed: Duration) -> TickAdvance {
        if self.is_paused() {
            return TickAdvance::none();
        }

        self.accumulated +=
            elapsed.as_secs_f64() * self.speed * self.config.ticks_per_second;

        let whole = self.accumulated.floor();
        if whole < 1.0 {
            return TickAdvance::none();
        }
        self.accumulated -= whole;

        let whole = whole as u64;
        let cap = self.config.max_ticks_per_update as u64;
        let count = whole.min(cap);
        let discarded = whole - count;
        if discarded > 0 {
            tracing::debug!(discarded, cap, "clock catch-up capped, surplus dropped");
        }

        let first = self.now.next();
        self.now = self.now + count;
        TickAdvance::new(first, count as u32, discarded)
    }

    /// Advance exactly one tick regardless of speed
    pub fn advance_one(&mut self) -> Tick {
        self.now = self.now.next();
        self.now
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}

/// Drives a `TickClock` from the monotonic OS clock
pub struct WallClock {
    /// Last poll instant
    last_poll: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock {
            last_poll: Instant::now(),
        }
    }

    /// Time since the previous call (or construction), resetting the mark
    pub fn elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_poll);
        self.last_poll = now;
        elapsed
    }

    /// Feed the time elapsed since the previous poll into `clock`
    pub fn poll(&mut self, clock: &mut TickClock) -> TickAdvance {
        let elapsed = self.elapsed();
        clock.update(elapsed)
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}
