//! Rolling "active seconds in the last 30 minutes" estimate.
//!
//! The estimate uses a strict closed-gap rule: only intervals bounded by two
//! real inputs count, and only when the gap between them does not exceed the
//! break threshold. The stretch from the last input up to the window end is
//! never counted, so activity is confirmed retrospectively once the next
//! input closes it.
//!
//! ```text
//!        window_start                              window_end
//!  prev  │   i0      i1          i2                    │
//!   ●────┼───●───────●───────────●                     │
//!        ├───┤ carry-in (left-clipped)                 │
//!            ├───────┤ interior gap                    │
//!                    ├───────────┤ interior gap        │
//!                                ├─────────────────────┤ never counted
//! ```
//!
//! Recomputation is throttled to 60-second calendar buckets: the estimate is
//! computed once per minute at the bucket boundary, and every query inside
//! the same minute returns the cached value.

use super::activity::IDLE_THRESHOLD;
use std::collections::VecDeque;

/// Trailing window length in seconds.
pub const WINDOW_SECONDS: u32 = 1800;
/// Bucket size for recomputation, in seconds.
pub const SAMPLE_SECONDS: i64 = 60;

const WINDOW_MS: i64 = WINDOW_SECONDS as i64 * 1000;
/// Inputs older than this relative to the newest one are dropped.
const KEEP_MS: i64 = WINDOW_MS + 10 * 60 * 1000;

/// Largest gap, in milliseconds, still counted as active inside the window.
pub fn break_threshold_ms() -> i64 {
    IDLE_THRESHOLD.as_millis() as i64
}

/// Ordered buffer of input timestamps (epoch milliseconds).
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    inputs: VecDeque<i64>,
}

impl InputBuffer {
    pub fn push(&mut self, epoch_ms: i64) {
        // Out-of-order stamps (wall clock stepped back) are clamped to keep the buffer sorted.
        let stamp = self.inputs.back().map_or(epoch_ms, |&last| epoch_ms.max(last));
        self.inputs.push_back(stamp);
    }

    /// Drops entries older than the retention horizon relative to `now_ms`.
    pub fn trim(&mut self, now_ms: i64) {
        let keep_from = now_ms - KEEP_MS;
        while self.inputs.front().is_some_and(|&t| t < keep_from) {
            self.inputs.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &i64> {
        self.inputs.iter()
    }
}

/// Last bucket the estimate was computed for, and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowCache {
    pub last_bucket: Option<i64>,
    pub active_secs: u32,
}

/// Sliding window estimator over buffered input timestamps.
#[derive(Debug, Clone, Default)]
pub struct ActivityWindow {
    buffer: InputBuffer,
    cache: WindowCache,
}

impl ActivityWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers one input timestamp. Never triggers a recomputation.
    pub fn record(&mut self, epoch_ms: i64) {
        self.buffer.push(epoch_ms);
        self.buffer.trim(epoch_ms);
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn cache(&self) -> WindowCache {
        self.cache
    }

    /// Active seconds inside `[window_end_ms - 1800s, window_end_ms]`.
    pub fn active_seconds_at(&mut self, window_end_ms: i64) -> u32 {
        self.buffer.trim(window_end_ms);
        active_seconds_in(self.buffer.iter().copied(), window_end_ms)
    }

    /// Bucket-anchored estimate for the tick at `now_ms`.
    ///
    /// When armed, recomputes only when the minute bucket changes, using the
    /// bucket boundary as the window end. When not armed, yields zero and
    /// resets the bucket cursor so arming starts from a fresh anchor.
    pub fn sample(&mut self, now_ms: i64, armed: bool) -> u32 {
        if !armed {
            self.cache = WindowCache::default();
            return 0;
        }

        let bucket = now_ms.div_euclid(1000).div_euclid(SAMPLE_SECONDS);
        if self.cache.last_bucket != Some(bucket) {
            let bucket_end_ms = bucket * SAMPLE_SECONDS * 1000;
            self.cache = WindowCache {
                last_bucket: Some(bucket),
                active_secs: self.active_seconds_at(bucket_end_ms),
            };
            tracing::debug!(bucket, active_secs = self.cache.active_secs, "recomputed activity window");
        }
        self.cache.active_secs
    }

    /// Forgets buffered inputs and the cached estimate.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cache = WindowCache::default();
    }
}

/// Strict closed-gap computation over an ordered stream of timestamps.
pub fn active_seconds_in<I>(inputs: I, window_end_ms: i64) -> u32
where
    I: IntoIterator<Item = i64>,
{
    let window_start = window_end_ms - WINDOW_MS;
    let threshold = break_threshold_ms();

    let mut prev_before: Option<i64> = None;
    let mut inside: Vec<i64> = Vec::new();
    for t in inputs {
        if t < window_start {
            prev_before = Some(t);
        } else if t <= window_end_ms {
            inside.push(t);
        } else {
            break;
        }
    }

    let mut active_ms: i64 = 0;

    // Carry-in: the gap that opens before the window, clipped at window_start.
    if let (Some(prev), Some(&first)) = (prev_before, inside.first()) {
        let gap = first - prev;
        if gap > 0 && gap <= threshold {
            let left = prev.max(window_start);
            if first > left {
                active_ms += first - left;
            }
        }
    }

    for pair in inside.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let gap = b - a;
        if gap > 0 && gap <= threshold {
            let left = a.max(window_start);
            let right = b.min(window_end_ms);
            if right > left {
                active_ms += right - left;
            }
        }
    }

    let secs = (active_ms / 1000).clamp(0, WINDOW_SECONDS as i64);
    secs as u32
}
