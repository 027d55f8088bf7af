//! Events published by the engine to its subscribers.

use super::clock::MonoTime;

/// One qualifying input (keystroke or click).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// Monotonic stamp used for gap arithmetic.
    pub mono: MonoTime,
    /// Wall-clock stamp used by the window estimate.
    pub epoch_ms: i64,
}

/// Totals composed once per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    /// Historical plus elapsed time of this run.
    pub total_project_ms: i64,
    /// Historical plus live active time; zero until armed.
    pub total_active_ms: i64,
    pub is_idle: bool,
    /// Active seconds in the last 30 minutes, as of the last minute boundary.
    pub recent_active_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Tick(TickEvent),
    Input(InputEvent),
    /// Tracking stopped for good after a conflict.
    Disabled { reason: String },
}
