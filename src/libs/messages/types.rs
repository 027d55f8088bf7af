/// Every user-facing message the application can produce.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIG MESSAGES ===
    ConfigModuleTracker,
    ConfigSaved,
    ConfigReadFailed(String),
    ProjectNameEmpty,
    ConfigPath(String),
    PromptProjectRoot,
    PromptProjectName,
    PromptRootMarker,
    PromptConflictInterval,
    PromptAddContentRoots,
    PromptContentRoots,
    ProjectRootMissing(String),

    // === WATCH MESSAGES ===
    WatchStarted {
        user: String,
        project: String,
        window_id: String,
    },
    HistoricalTotals {
        total_project: String,
        total_active: String,
    },
    LiveStatus {
        project_time: String,
        active_time: String,
        recent: String,
        is_idle: bool,
    },
    TrackingSuppressed,
    TrackingDisabled(String),
    RegistrationFailed(String),
    InputListenerFailed(String),
    StatusLagged(u64), // skipped events
    MonitorShuttingDown,
    FinalRowWritten(String), // ledger path
    FinalRowSkipped,

    // === SIGNAL MESSAGES ===
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,

    // === LEDGER MESSAGES ===
    LedgerEmpty(String),  // project
    LedgerHeader(String), // project
    LedgerPath(String),

    // === STATUS MESSAGES ===
    StatusCurrent {
        project: String,
        status: String,
    },
    StatusSet {
        project: String,
        status: String,
    },
}
