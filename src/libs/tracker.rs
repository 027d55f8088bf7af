//! The serialized core of the engine.
//!
//! [`Tracker`] owns every piece of mutable session state behind a single
//! `parking_lot::Mutex`: the gap classifier, the sliding window and its
//! cache. Inputs, ticks and conflict trips all go through that lock, which
//! makes it the one boundary where races can happen.
//!
//! ## Lifecycle
//!
//! ```text
//!            ┌──────────┐  conflict   ┌──────────┐
//!  start ──▶ │  Active  │ ──────────▶ │ Disabled │──▶ final row written once
//!            └──────────┘             └──────────┘
//!                 │ shutdown
//!                 ▼
//!            ┌──────────┐
//!            │ Finished │──▶ final row written once
//!            └──────────┘
//! ```
//!
//! Leaving `Active` is a compare-and-set done while the state lock is held,
//! so no partially applied input or tick can be observed afterwards, and the
//! final ledger row is written exactly once whichever way the run ends.
//! Ledger I/O itself always happens after the lock is released.

use super::activity::ActivityClassifier;
use super::clock::{Clock, MonoTime};
use super::conflict::{Conflict, ConflictMonitor};
use super::events::{EngineEvent, InputEvent, TickEvent};
use super::ledger::{HistoricalTotals, Ledger};
use super::status::TrackingStatus;
use super::summary::{CounterSnapshot, RunInfo, SessionSummary};
use super::window::ActivityWindow;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

const ACTIVE: u8 = 0;
const DISABLED: u8 = 1;
const FINISHED: u8 = 2;

/// Run identity and collaborators for a new tracker.
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    pub user: String,
    pub project: String,
    pub ledger: Ledger,
    pub status: TrackingStatus,
}

#[derive(Debug, Default)]
struct TrackerState {
    classifier: ActivityClassifier,
    window: ActivityWindow,
    recent_active_secs: u32,
}

pub struct Tracker {
    clock: Arc<dyn Clock>,
    run: RunInfo,
    ledger: Ledger,
    historical: HistoricalTotals,
    status: TrackingStatus,
    state: Mutex<TrackerState>,
    lifecycle: AtomicU8,
    events: broadcast::Sender<EngineEvent>,
}

impl Tracker {
    /// Starts a run now, merging historical totals from the ledger.
    pub fn new(options: TrackerOptions, clock: Arc<dyn Clock>) -> Self {
        let historical = options.ledger.historical_totals();
        tracing::debug!(
            project = %options.project,
            historical_project_secs = historical.total_project.as_secs(),
            historical_active_secs = historical.total_active.as_secs(),
            "merged ledger history"
        );

        let run = RunInfo {
            user: options.user,
            project: options.project,
            started_at: clock.wall(),
            started_mono: clock.monotonic(),
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            clock,
            run,
            ledger: options.ledger,
            historical,
            status: options.status,
            state: Mutex::new(TrackerState::default()),
            lifecycle: AtomicU8::new(ACTIVE),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn run(&self) -> &RunInfo {
        &self.run
    }

    pub fn historical(&self) -> HistoricalTotals {
        self.historical
    }

    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.load(Ordering::Acquire) == ACTIVE
    }

    /// True once a conflict tripped the latch.
    pub fn is_disabled(&self) -> bool {
        self.lifecycle.load(Ordering::Acquire) == DISABLED
    }

    fn publish(&self, event: EngineEvent) {
        // No receivers is fine; slow receivers lag instead of blocking us.
        let _ = self.events.send(event);
    }

    /// Stamps an input with the current clock readings and records it.
    pub fn record_input(&self) -> bool {
        let event = InputEvent {
            mono: self.clock.monotonic(),
            epoch_ms: self.clock.epoch_millis(),
        };
        self.record_input_at(event)
    }

    /// Classifies and buffers one input. Returns false once tracking stopped.
    pub fn record_input_at(&self, event: InputEvent) -> bool {
        let mut state = self.state.lock();
        if !self.is_active() {
            return false;
        }

        let kind = state.classifier.on_input(event.mono);
        tracing::trace!(?kind, inputs = state.classifier.input_count(), "input classified");

        if self.status.is_enabled() {
            state.window.record(event.epoch_ms);
            let tick = self.compose(&state, event.mono);
            self.publish(EngineEvent::Input(event));
            self.publish(EngineEvent::Tick(tick));
        }
        true
    }

    fn compose(&self, state: &TrackerState, now: MonoTime) -> TickEvent {
        let classifier = &state.classifier;
        let total_project = self.historical.total_project + now.saturating_since(self.run.started_mono);
        let total_active = if classifier.is_armed() {
            self.historical.total_active + classifier.live_active()
        } else {
            std::time::Duration::ZERO
        };

        TickEvent {
            total_project_ms: total_project.as_millis() as i64,
            total_active_ms: total_active.as_millis() as i64,
            is_idle: classifier.is_idle(now),
            recent_active_secs: state.recent_active_secs,
        }
    }

    /// Composes and publishes the tick for the current clock readings.
    pub fn tick(&self) -> Option<TickEvent> {
        self.tick_at(self.clock.monotonic(), self.clock.epoch_millis())
    }

    /// Composes the tick at the given instant, refreshing the window estimate
    /// on minute boundaries. `None` once tracking stopped.
    pub fn tick_at(&self, now: MonoTime, now_ms: i64) -> Option<TickEvent> {
        let mut state = self.state.lock();
        if !self.is_active() {
            return None;
        }

        if self.status.is_enabled() {
            let armed = state.classifier.is_armed();
            state.recent_active_secs = state.window.sample(now_ms, armed);
        }
        let tick = self.compose(&state, now);
        if self.status.is_enabled() {
            self.publish(EngineEvent::Tick(tick));
        }
        Some(tick)
    }

    /// Copy of the live counters.
    pub fn snapshot(&self) -> CounterSnapshot {
        let state = self.state.lock();
        CounterSnapshot {
            totals: *state.classifier.totals(),
            current_session: state.classifier.current_session(),
        }
    }

    /// Runs the conflict heuristics and trips the latch on the first hit.
    ///
    /// Returns the conflict only for the call that actually tripped it.
    pub fn check_conflicts(&self, monitor: &ConflictMonitor) -> Option<Conflict> {
        if !self.is_active() {
            return None;
        }
        let conflict = monitor.evaluate()?;
        self.disable(&conflict.reason).then_some(conflict)
    }

    /// Permanently stops tracking and writes the final row.
    ///
    /// Idempotent: only the first call (or the first of disable/finish)
    /// has any effect.
    pub fn disable(&self, reason: &str) -> bool {
        let captured = {
            let state = self.state.lock();
            if self
                .lifecycle
                .compare_exchange(ACTIVE, DISABLED, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return false;
            }
            self.publish(EngineEvent::Disabled { reason: reason.to_string() });
            self.capture(&state)
        };

        tracing::warn!(project = %self.run.project, reason, "tracking disabled");
        self.write_final(captured);
        true
    }

    /// Normal end of the run. Writes the final row unless a conflict already did.
    pub fn finish(&self) -> bool {
        let captured = {
            let state = self.state.lock();
            if self
                .lifecycle
                .compare_exchange(ACTIVE, FINISHED, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return false;
            }
            self.capture(&state)
        };

        self.write_final(captured)
    }

    fn capture(&self, state: &TrackerState) -> (CounterSnapshot, MonoTime, DateTime<Local>) {
        let snapshot = CounterSnapshot {
            totals: *state.classifier.totals(),
            current_session: state.classifier.current_session(),
        };
        (snapshot, self.clock.monotonic(), self.clock.wall())
    }

    /// Appends the final row. Failures are logged and swallowed.
    fn write_final(&self, (snapshot, ended_mono, ended_at): (CounterSnapshot, MonoTime, DateTime<Local>)) -> bool {
        let elapsed = ended_mono.saturating_since(self.run.started_mono);
        let row = SessionSummary::build(&snapshot, elapsed).into_row(&self.run, ended_at);

        match self.ledger.append(&row) {
            Ok(()) => {
                tracing::debug!(path = %self.ledger.path().display(), sessions = row.sessions, "final row written");
                true
            }
            Err(e) => {
                tracing::warn!(path = %self.ledger.path().display(), error = %e, "final row lost");
                false
            }
        }
    }
}
