//! Time sources for the activity engine.
//!
//! Two notions of time are kept apart on purpose:
//!
//! - **Monotonic time** ([`MonoTime`]) for every duration that feeds the
//!   counters. It never goes backwards and ignores wall-clock adjustments.
//! - **Wall-clock time** (`chrono::DateTime<Local>`) for record keeping only:
//!   ledger timestamps and the epoch milliseconds attached to input events.
//!
//! The engine reads both through the [`Clock`] trait so tests can drive time
//! by hand with [`ManualClock`].
//!
//! ## Usage
//!
//! ```rust
//! use devrhythm::libs::clock::{Clock, ManualClock};
//! use std::time::Duration;
//!
//! let clock = ManualClock::default();
//! let before = clock.monotonic();
//! clock.advance(Duration::from_secs(4));
//! assert_eq!(clock.monotonic().saturating_since(before), Duration::from_secs(4));
//! ```

use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// A point on the monotonic timeline, in nanoseconds since the clock origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MonoTime(u64);

impl MonoTime {
    pub const ZERO: MonoTime = MonoTime(0);

    pub fn from_nanos(nanos: u64) -> Self {
        MonoTime(nanos)
    }

    pub fn from_secs(secs: u64) -> Self {
        MonoTime(secs.saturating_mul(1_000_000_000))
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Elapsed time from `earlier` to `self`, zero if `earlier` is later.
    pub fn saturating_since(&self, earlier: MonoTime) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }

    pub fn add(&self, delta: Duration) -> MonoTime {
        let nanos = u64::try_from(delta.as_nanos()).unwrap_or(u64::MAX);
        MonoTime(self.0.saturating_add(nanos))
    }
}

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync {
    /// Current monotonic reading. Non-decreasing across calls.
    fn monotonic(&self) -> MonoTime;

    /// Current local wall-clock time.
    fn wall(&self) -> DateTime<Local>;

    /// Current wall-clock time as Unix epoch milliseconds.
    fn epoch_millis(&self) -> i64 {
        self.wall().timestamp_millis()
    }
}

/// Production clock backed by `std::time::Instant` and `chrono::Local`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> MonoTime {
        let nanos = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        MonoTime(nanos)
    }

    fn wall(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Hand-driven clock. Monotonic and wall time advance together.
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<ManualState>,
}

#[derive(Debug)]
struct ManualState {
    mono: MonoTime,
    wall: DateTime<Local>,
}

impl ManualClock {
    /// Starts at monotonic zero and the given wall-clock instant.
    pub fn starting_at(wall: DateTime<Local>) -> Self {
        Self {
            inner: Mutex::new(ManualState { mono: MonoTime::ZERO, wall }),
        }
    }

    /// Starts at monotonic zero and the given epoch milliseconds.
    pub fn starting_at_millis(epoch_ms: i64) -> Self {
        let wall = Local.timestamp_millis_opt(epoch_ms).single().unwrap_or_else(Local::now);
        Self::starting_at(wall)
    }

    pub fn advance(&self, delta: Duration) {
        let mut state = self.inner.lock();
        state.mono = state.mono.add(delta);
        state.wall += chrono::Duration::from_std(delta).unwrap_or_else(|_| chrono::Duration::zero());
    }

    /// Moves the wall clock only, as a user adjusting the system time would.
    pub fn shift_wall(&self, delta: chrono::Duration) {
        self.inner.lock().wall += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(Local::now())
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> MonoTime {
        self.inner.lock().mono
    }

    fn wall(&self) -> DateTime<Local> {
        self.inner.lock().wall
    }
}
