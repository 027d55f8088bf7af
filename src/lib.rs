//! # devrhythm
//!
//! Per-project activity telemetry for developers.
//!
//! While `devrhythm watch` runs, every keystroke and mouse click is
//! classified against a five minute idle threshold. The run accumulates
//! active time, breaks and "mini sessions", publishes live totals once per
//! second, estimates how much of the last 30 minutes was active, and appends
//! exactly one summary row to a per-user, per-project CSV ledger when it
//! ends. Totals from earlier runs are merged from that ledger on start.
//!
//! Tracking stops for good when a second project shows up in the same
//! window or under the same root.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use devrhythm::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod libs;
