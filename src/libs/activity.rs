//! Input gap classification and live session/break accounting.
//!
//! Every qualifying input (keystroke or click) is fed to
//! [`ActivityClassifier::on_input`] with its monotonic timestamp. The gap to
//! the previous input decides whether the user kept working or took a break:
//!
//! ```text
//!  input   input  input               input
//!    │──4s──│──4s──│────── 400s ────────│
//!    └─ session (8s) ─┘└──── break ─────┘
//! ```
//!
//! ## Arming
//!
//! The first input only seeds the timeline. The second input arms the
//! session; before that, reported active time is always zero.
//!
//! ## Live vs. final accounting
//!
//! A session is folded into [`Accumulator`] only when a break closes it. The
//! still-open session is exposed separately through
//! [`ActivityClassifier::current_session`] so live totals and the final
//! ledger row can each treat it their own way.

use super::clock::MonoTime;
use std::time::Duration;

/// Longest inter-input gap still counted as continuous activity.
///
/// The single idleness constant of the crate: the classifier, the idle flag
/// and the sliding window estimator all read it from here.
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(300);

/// Closed-session and break counters, non-decreasing while armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accumulator {
    pub total_active: Duration,
    pub total_break: Duration,
    pub session_count: u32,
    pub max_session: Duration,
    /// `None` until the first session closes.
    pub min_session: Option<Duration>,
    pub break_count: u32,
    pub max_break: Duration,
    /// `None` until the first break is recorded.
    pub min_break: Option<Duration>,
}

impl Accumulator {
    fn close_session(&mut self, session: Duration) {
        self.session_count += 1;
        self.total_active += session;
        self.max_session = self.max_session.max(session);
        self.min_session = Some(self.min_session.map_or(session, |m| m.min(session)));
    }

    fn record_break(&mut self, gap: Duration) {
        self.break_count += 1;
        self.total_break += gap;
        self.max_break = self.max_break.max(gap);
        self.min_break = Some(self.min_break.map_or(gap, |m| m.min(gap)));
    }
}

/// Outcome of classifying one input, mostly useful for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    /// First input ever seen; nothing to measure yet.
    Seed,
    /// The gap extends the current session.
    Continue(Duration),
    /// The gap was a break; a non-empty session (if any) was closed.
    Break(Duration),
}

/// Session state owned by the classifier.
#[derive(Debug, Clone, Default)]
pub struct ActivityClassifier {
    input_count: u64,
    last_input: Option<MonoTime>,
    current_session: Duration,
    totals: Accumulator,
}

impl ActivityClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies the gap between the previous input and `t`.
    pub fn on_input(&mut self, t: MonoTime) -> GapKind {
        self.input_count = self.input_count.saturating_add(1);

        let Some(last) = self.last_input.replace(t) else {
            return GapKind::Seed;
        };
        let gap = t.saturating_since(last);

        if self.input_count == 2 {
            // Arming input: the gap seeds the session or is dropped, never a break.
            self.current_session = if gap < IDLE_THRESHOLD { gap } else { Duration::ZERO };
            return GapKind::Continue(self.current_session);
        }

        if gap >= IDLE_THRESHOLD {
            if !self.current_session.is_zero() {
                self.totals.close_session(self.current_session);
            }
            self.totals.record_break(gap);
            self.current_session = Duration::ZERO;
            GapKind::Break(gap)
        } else {
            self.current_session += gap;
            GapKind::Continue(gap)
        }
    }

    /// True once at least two inputs were observed.
    pub fn is_armed(&self) -> bool {
        self.input_count >= 2
    }

    pub fn has_seen_input(&self) -> bool {
        self.last_input.is_some()
    }

    pub fn input_count(&self) -> u64 {
        self.input_count
    }

    pub fn last_input(&self) -> Option<MonoTime> {
        self.last_input
    }

    /// Idle when no input arrived within [`IDLE_THRESHOLD`], and always
    /// before the first input.
    pub fn is_idle(&self, now: MonoTime) -> bool {
        match self.last_input {
            Some(last) => now.saturating_since(last) >= IDLE_THRESHOLD,
            None => true,
        }
    }

    /// Accumulation of the session that is still open.
    pub fn current_session(&self) -> Duration {
        self.current_session
    }

    pub fn totals(&self) -> &Accumulator {
        &self.totals
    }

    /// Active time for live reporting: closed sessions plus the open one,
    /// forced to zero before arming.
    pub fn live_active(&self) -> Duration {
        if self.is_armed() {
            self.totals.total_active + self.current_session
        } else {
            Duration::ZERO
        }
    }
}
