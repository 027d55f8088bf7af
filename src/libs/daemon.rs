//! Foreground watch loop with graceful shutdown.
//!
//! Wires the configured project into a running engine:
//!
//! 1. Resolves the user, project, ledger and status record paths.
//! 2. Registers this process in the session registry for its window.
//! 3. Starts the engine with both conflict checks and the global input
//!    listener.
//! 4. Prints a status line whenever the displayed minute or the idle state
//!    changes, until SIGINT/SIGTERM (Ctrl+C on Windows) arrives.
//! 5. Shuts the engine down, which writes the final ledger row unless a
//!    conflict already did.

use crate::libs::clock::SystemClock;
use crate::libs::config::{Config, TrackerConfig};
use crate::libs::conflict::{ConflictMonitor, ProjectRootsCheck, SharedWindowCheck};
use crate::libs::data_storage::{current_user, DataStorage};
use crate::libs::engine::EngineHandle;
use crate::libs::events::{EngineEvent, TickEvent};
use crate::libs::formatter::{format_hm_rounded, format_hms, format_minutes_rounded};
use crate::libs::ledger::Ledger;
use crate::libs::messages::Message;
use crate::libs::monitor::Monitor;
use crate::libs::session_registry::{detect_window_id, SessionRegistry};
use crate::libs::status::StatusRecord;
use crate::libs::tracker::{Tracker, TrackerOptions};
use crate::{msg_debug, msg_error, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;

/// Runs the tracker in the foreground until a termination signal arrives.
pub async fn run_with_signal_handling() -> Result<()> {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    spawn_signal_listener(shutdown_tx);

    let config = Config::read()?.tracker.unwrap_or_default();
    let storage = DataStorage::new();
    let engine = start_engine(&config, &storage)?;
    let tracker = engine.tracker().clone();

    let historical = tracker.historical();
    msg_info!(Message::HistoricalTotals {
        total_project: format_hms(historical.total_project.as_millis() as i64),
        total_active: format_hms(historical.total_active.as_millis() as i64),
    });
    if !tracker.status().is_enabled() {
        msg_info!(Message::TrackingSuppressed);
    }

    let mut events = engine.subscribe();
    let _listener = match Monitor::new(engine.input_sender()).spawn() {
        Ok(handle) => Some(handle),
        Err(e) => {
            msg_warning!(Message::InputListenerFailed(e.to_string()));
            None
        }
    };
    let mut printer = StatusPrinter::default();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(EngineEvent::Tick(tick)) => {
                    printer.on_tick(&tick);
                }
                Ok(EngineEvent::Disabled { reason }) => msg_warning!(Message::TrackingDisabled(reason)),
                Ok(EngineEvent::Input(_)) => {}
                Err(RecvError::Lagged(skipped)) => msg_debug!(Message::StatusLagged(skipped)),
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown_rx => {
                msg_info!(Message::MonitorShuttingDown);
                break;
            }
        }
    }

    let disabled = tracker.is_disabled();
    if engine.shutdown().await {
        msg_success!(Message::FinalRowWritten(tracker.ledger().path().display().to_string()));
    } else if !disabled {
        msg_warning!(Message::FinalRowSkipped);
    }

    Ok(())
}

/// Builds the tracker for the configured project and starts the engine.
pub fn start_engine(config: &TrackerConfig, storage: &DataStorage) -> Result<EngineHandle> {
    let user = current_user();
    let project = config.project_name();
    let ledger = Ledger::new(storage.get_path(&Ledger::file_name(&user, &project))?);
    let status = StatusRecord::new(storage.get_path(&StatusRecord::file_name(&user, &project))?).read();

    let tracker = Arc::new(Tracker::new(
        TrackerOptions {
            user: user.clone(),
            project: project.clone(),
            ledger,
            status,
        },
        Arc::new(SystemClock::new()),
    ));

    let window_id = config.window_id.clone().unwrap_or_else(detect_window_id);
    let registry = SessionRegistry::new(storage.sessions_dir()?);
    let registration = match registry.register(&window_id, &project) {
        Ok(registration) => Some(registration),
        Err(e) => {
            msg_warning!(Message::RegistrationFailed(e.to_string()));
            None
        }
    };

    let monitor = ConflictMonitor::new()
        .with_check(SharedWindowCheck::new(registry, window_id.clone()))
        .with_check(ProjectRootsCheck::new(
            config.resolved_root(),
            config.content_roots.clone(),
            config.root_marker.clone(),
        ));

    msg_print!(Message::WatchStarted {
        user,
        project,
        window_id,
    });

    let mut engine = EngineHandle::start(tracker, monitor, config.engine_settings());
    if let Some(registration) = registration {
        engine = engine.with_registration(registration);
    }
    Ok(engine)
}

fn spawn_signal_listener(shutdown_tx: oneshot::Sender<()>) {
    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    msg_info!(Message::WatcherReceivedSigterm);
                }
                _ = sigint.recv() => {
                    msg_info!(Message::WatcherReceivedSigint);
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    msg_info!(Message::WatcherReceivedCtrlC);
                }
                Err(e) => {
                    msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        tokio::spawn(async move {
            std::future::pending::<()>().await;
            let _ = shutdown_tx.send(());
        });
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
    }
}

/// Prints the live status line when the shown minute or the idle flag changes.
#[derive(Debug, Default)]
pub struct StatusPrinter {
    last: Option<(i64, bool)>,
}

impl StatusPrinter {
    /// Returns true when a line was printed.
    pub fn on_tick(&mut self, tick: &TickEvent) -> bool {
        let key = (tick.total_project_ms / 60_000, tick.is_idle);
        if self.last == Some(key) {
            return false;
        }
        self.last = Some(key);

        msg_print!(Message::LiveStatus {
            project_time: format_hm_rounded(tick.total_project_ms),
            active_time: format_hm_rounded(tick.total_active_ms),
            recent: format_minutes_rounded(tick.recent_active_secs),
            is_idle: tick.is_idle,
        });
        true
    }
}
