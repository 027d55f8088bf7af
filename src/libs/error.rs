//! Error type shared by the engine's fallible building blocks.
//!
//! None of these errors reach the host: the tracker logs them and carries on
//! with a zero contribution. They exist so the building blocks stay testable
//! and so the CLI can report them when it calls the same functions directly.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("ledger I/O failed for {path}: {source}")]
    LedgerIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("session registry error at {path}: {source}")]
    Registry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("status record I/O failed for {path}: {source}")]
    StatusIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("conflict check `{check}` failed: {reason}")]
    Check { check: &'static str, reason: String },
}

pub type TrackerResult<T> = Result<T, TrackerError>;
