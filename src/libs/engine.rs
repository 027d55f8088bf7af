//! Async runtime around the [`Tracker`].
//!
//! Three tasks feed the tracker:
//!
//! - **ticker**: composes and publishes totals every `tick_interval`. Missed
//!   ticks are skipped so a slow period never delays the next one.
//! - **input drain**: pulls stamped [`InputEvent`]s from an `mpsc` queue
//!   filled by the input source.
//! - **conflict poll**: re-runs the conflict heuristics on a blocking thread,
//!   immediately at start and then every `conflict_interval`.
//!
//! [`EngineHandle::shutdown`] stops all three through a `watch` channel,
//! joins them and then writes the final ledger row to completion.

use super::clock::Clock;
use super::conflict::{Conflict, ConflictMonitor};
use super::events::{EngineEvent, InputEvent};
use super::session_registry::Registration;
use super::tracker::Tracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Timing and queue sizes for the engine tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub tick_interval: Duration,
    pub conflict_interval: Duration,
    pub input_queue: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            conflict_interval: Duration::from_secs(30),
            input_queue: 1024,
        }
    }
}

/// Cloneable producer side of the input queue.
#[derive(Clone)]
pub struct InputSender {
    tx: mpsc::Sender<InputEvent>,
    clock: Arc<dyn Clock>,
}

impl InputSender {
    fn stamp(&self) -> InputEvent {
        InputEvent {
            mono: self.clock.monotonic(),
            epoch_ms: self.clock.epoch_millis(),
        }
    }

    /// Stamps and queues an input from async code.
    pub async fn send(&self) -> bool {
        self.tx.send(self.stamp()).await.is_ok()
    }

    /// Stamps and queues an input without waiting; dropped if the queue is full.
    pub fn try_send(&self) -> bool {
        self.tx.try_send(self.stamp()).is_ok()
    }
}

pub struct EngineHandle {
    tracker: Arc<Tracker>,
    monitor: Arc<ConflictMonitor>,
    input_tx: mpsc::Sender<InputEvent>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    registration: Option<Registration>,
}

impl EngineHandle {
    /// Spawns the engine tasks on the current tokio runtime.
    pub fn start(tracker: Arc<Tracker>, monitor: ConflictMonitor, settings: EngineSettings) -> Self {
        let monitor = Arc::new(monitor);
        let (input_tx, input_rx) = mpsc::channel(settings.input_queue.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let tasks = vec![
            tokio::spawn(run_ticker(tracker.clone(), settings.tick_interval, shutdown_rx.clone())),
            tokio::spawn(run_input_drain(tracker.clone(), input_rx, shutdown_rx.clone())),
            tokio::spawn(run_conflict_poll(
                tracker.clone(),
                monitor.clone(),
                settings.conflict_interval,
                shutdown_rx,
            )),
        ];

        Self {
            tracker,
            monitor,
            input_tx,
            shutdown_tx,
            tasks,
            registration: None,
        }
    }

    /// Keeps a session registration alive for the engine's lifetime.
    pub fn with_registration(mut self, registration: Registration) -> Self {
        self.registration = Some(registration);
        self
    }

    pub fn tracker(&self) -> &Arc<Tracker> {
        &self.tracker
    }

    pub fn input_sender(&self) -> InputSender {
        InputSender {
            tx: self.input_tx.clone(),
            clock: self.tracker.clock().clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tracker.subscribe()
    }

    /// Re-evaluates conflicts now, e.g. after an environment change.
    pub async fn check_conflicts(&self) -> Option<Conflict> {
        evaluate_conflicts(&self.tracker, &self.monitor).await
    }

    /// Stops the tasks and writes the final row unless a conflict already did.
    pub async fn shutdown(self) -> bool {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "engine task ended abnormally");
            }
        }

        let tracker = self.tracker.clone();
        let written = tokio::task::spawn_blocking(move || tracker.finish()).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "final write task failed");
            false
        });
        drop(self.registration);
        written
    }
}

async fn evaluate_conflicts(tracker: &Arc<Tracker>, monitor: &Arc<ConflictMonitor>) -> Option<Conflict> {
    let (tracker, monitor) = (tracker.clone(), monitor.clone());
    match tokio::task::spawn_blocking(move || tracker.check_conflicts(&monitor)).await {
        Ok(conflict) => conflict,
        Err(e) => {
            tracing::warn!(error = %e, "conflict check task failed");
            None
        }
    }
}

async fn run_ticker(tracker: Arc<Tracker>, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if tracker.tick().is_none() {
                    tracing::debug!("ticker stopped");
                    break;
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}

async fn run_input_drain(tracker: Arc<Tracker>, mut inputs: mpsc::Receiver<InputEvent>, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            event = inputs.recv() => match event {
                // After a conflict this is a no-op; keep draining so producers never block.
                Some(event) => { tracker.record_input_at(event); }
                None => break,
            },
            _ = shutdown.changed() => {
                // Inputs already queued were accepted and still count.
                while let Ok(event) = inputs.try_recv() {
                    tracker.record_input_at(event);
                }
                break;
            }
        }
    }
}

async fn run_conflict_poll(
    tracker: Arc<Tracker>,
    monitor: Arc<ConflictMonitor>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    if monitor.is_empty() {
        return;
    }
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Some(conflict) = evaluate_conflicts(&tracker, &monitor).await {
                    tracing::debug!(check = conflict.check, "conflict detected");
                }
                if !tracker.is_active() {
                    break;
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}
