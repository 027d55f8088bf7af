//! Core library modules for devrhythm.
//!
//! ## Layout
//!
//! - **Accounting**: [`activity`] classifies input gaps, [`window`] estimates
//!   recent activity, [`summary`] derives the end-of-run statistics.
//! - **Persistence**: [`ledger`] and [`status`] own the CSV files,
//!   [`session_registry`] tracks live processes per window.
//! - **Runtime**: [`tracker`] serializes all state changes, [`engine`] drives
//!   it from tokio tasks, [`conflict`] decides when to stop, [`monitor`]
//!   listens for raw input, [`daemon`] runs the foreground watch loop.
//! - **Infrastructure**: [`clock`], [`config`], [`data_storage`], [`error`],
//!   [`events`], [`messages`].
//! - **Presentation**: [`formatter`], [`view`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use devrhythm::libs::clock::SystemClock;
//! use devrhythm::libs::ledger::Ledger;
//! use devrhythm::libs::status::TrackingStatus;
//! use devrhythm::libs::tracker::{Tracker, TrackerOptions};
//! use std::sync::Arc;
//!
//! let tracker = Tracker::new(
//!     TrackerOptions {
//!         user: "alice".into(),
//!         project: "backend".into(),
//!         ledger: Ledger::new("alice_backend_idle_stats.csv"),
//!         status: TrackingStatus::Enabled,
//!     },
//!     Arc::new(SystemClock::new()),
//! );
//! tracker.record_input();
//! tracker.finish();
//! ```

pub mod activity;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod daemon;
pub mod data_storage;
pub mod engine;
pub mod error;
pub mod events;
pub mod formatter;
pub mod ledger;
pub mod messages;
pub mod monitor;
pub mod session_registry;
pub mod status;
pub mod summary;
pub mod tracker;
pub mod view;
pub mod window;
