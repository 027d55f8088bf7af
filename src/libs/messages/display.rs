use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIG MESSAGES ===
            Message::ConfigModuleTracker => "Tracker settings".to_string(),
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigReadFailed(error) => format!("Failed to read configuration: {}", error),
            Message::ProjectNameEmpty => "Project name must not be empty".to_string(),
            Message::ConfigPath(path) => format!("Configuration file: {}", path),
            Message::PromptProjectRoot => "Project root directory".to_string(),
            Message::PromptProjectName => "Project name".to_string(),
            Message::PromptRootMarker => "Project root marker directory".to_string(),
            Message::PromptConflictInterval => "Conflict re-check interval (seconds)".to_string(),
            Message::PromptAddContentRoots => "Add extra content roots?".to_string(),
            Message::PromptContentRoots => "Content roots (comma separated)".to_string(),
            Message::ProjectRootMissing(path) => format!("Project root {} is not a directory", path),

            // === WATCH MESSAGES ===
            Message::WatchStarted { user, project, window_id } => {
                format!("Tracking '{}' for {} (window {}). Press Ctrl+C to stop.", project, user, window_id)
            }
            Message::HistoricalTotals { total_project, total_active } => {
                format!("Recorded so far: {} in project, {} active", total_project, total_active)
            }
            Message::LiveStatus {
                project_time,
                active_time,
                recent,
                is_idle,
            } => {
                let state = if *is_idle { "idle" } else { "active" };
                format!(
                    "Project {} | Active {} | {} of last 30 mins | {}",
                    project_time, active_time, recent, state
                )
            }
            Message::TrackingSuppressed => "Status display is suppressed for this project. Time is still recorded.".to_string(),
            Message::TrackingDisabled(reason) => format!("Tracking disabled: {}", reason),
            Message::RegistrationFailed(error) => format!("Failed to register session: {}", error),
            Message::InputListenerFailed(error) => {
                format!("Failed to start the input listener, only the clock advances: {}", error)
            }
            Message::StatusLagged(skipped) => format!("Status display skipped {} events", skipped),
            Message::MonitorShuttingDown => "Shutting down tracker...".to_string(),
            Message::FinalRowWritten(path) => format!("Session saved to {}", path),
            Message::FinalRowSkipped => "Session was already finalized, nothing written.".to_string(),

            // === SIGNAL MESSAGES ===
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down.".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down.".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down.".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform.".to_string(),

            // === LEDGER MESSAGES ===
            Message::LedgerEmpty(project) => format!("No recorded sessions for '{}'.", project),
            Message::LedgerHeader(project) => format!("Recorded sessions for '{}':", project),
            Message::LedgerPath(path) => format!("Ledger: {}", path),

            // === STATUS MESSAGES ===
            Message::StatusCurrent { project, status } => format!("Status display for '{}' is {}.", project, status),
            Message::StatusSet { project, status } => format!("Status display for '{}' set to {}.", project, status),
        };
        write!(f, "{}", text)
    }
}
