//! Final per-run statistics written to the ledger.
//!
//! Live reporting only counts a session once a break closes it. The final
//! row is more generous: a session that is still open and non-empty when the
//! run ends counts as one more session, and its duration takes part in the
//! min/max/average figures.

use super::activity::Accumulator;
use super::clock::MonoTime;
use super::ledger::LedgerRow;
use chrono::{DateTime, Local};
use std::time::Duration;

/// Identity and start of one tracked run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunInfo {
    pub user: String,
    pub project: String,
    pub started_at: DateTime<Local>,
    pub started_mono: MonoTime,
}

/// Counters copied out of the tracker state, safe to use without the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub totals: Accumulator,
    pub current_session: Duration,
}

/// Session and break statistics for the final row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub total_time: Duration,
    pub active_time: Duration,
    pub break_time: Duration,
    pub sessions: u32,
    pub avg_session: Duration,
    pub max_session: Duration,
    pub min_session: Duration,
    pub avg_break: Duration,
    pub max_break: Duration,
    pub min_break: Duration,
}

impl SessionSummary {
    /// Builds the statistics for a run that lasted `elapsed`.
    pub fn build(snapshot: &CounterSnapshot, elapsed: Duration) -> Self {
        let totals = &snapshot.totals;
        let open = snapshot.current_session;

        let active_time = totals.total_active + open;
        let sessions = totals.session_count + u32::from(!open.is_zero());
        let avg_session = if sessions > 0 { active_time / sessions } else { Duration::ZERO };

        let (max_session, min_session) = if totals.session_count == 0 {
            (open, open)
        } else {
            let closed_min = totals.min_session.unwrap_or(open);
            let min = if open.is_zero() { closed_min } else { closed_min.min(open) };
            (totals.max_session.max(open), min)
        };

        let avg_break = if totals.break_count > 0 {
            totals.total_break / totals.break_count
        } else {
            Duration::ZERO
        };

        SessionSummary {
            total_time: elapsed,
            active_time,
            break_time: totals.total_break,
            sessions,
            avg_session,
            max_session,
            min_session,
            avg_break,
            max_break: totals.max_break,
            min_break: totals.min_break.unwrap_or(Duration::ZERO),
        }
    }

    /// Turns the statistics into a ledger row for the given run.
    pub fn into_row(self, run: &RunInfo, ended_at: DateTime<Local>) -> LedgerRow {
        LedgerRow {
            user: run.user.clone(),
            project: run.project.clone(),
            start: run.started_at,
            end: ended_at,
            total_time: self.total_time,
            active_time: self.active_time,
            break_time: self.break_time,
            sessions: self.sessions,
            avg_session: self.avg_session,
            avg_break: self.avg_break,
            max_session: self.max_session,
            min_session: self.min_session,
            max_break: self.max_break,
            min_break: self.min_break,
        }
    }
}
