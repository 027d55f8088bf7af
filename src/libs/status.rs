//! Per-project status record: whether tracking output is shown or suppressed.
//!
//! The engine only reads this file. The `status` command writes it.
//!
//! ```text
//! Username,Project,Date,Time,Epoch (us),Status
//! alice,backend,2025-03-04,09:12:44.120331,1741079564120331,Show
//! ```

use super::error::{TrackerError, TrackerResult};
use super::ledger::{DATE_FORMAT, TIME_FORMAT_MICROS};
use chrono::Local;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const STATUS_SHOW: &str = "Show";
pub const STATUS_HIDE: &str = "Do not Show";

const STATUS_HEADER: [&str; 6] = ["Username", "Project", "Date", "Time", "Epoch (us)", "Status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingStatus {
    /// Ticks, input and window events are published.
    #[default]
    Enabled,
    /// Accounting continues, nothing is published.
    Suppressed,
}

impl TrackingStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, TrackingStatus::Enabled)
    }

    fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            STATUS_SHOW => Some(TrackingStatus::Enabled),
            STATUS_HIDE => Some(TrackingStatus::Suppressed),
            _ => None,
        }
    }

    fn as_cell(&self) -> &'static str {
        match self {
            TrackingStatus::Enabled => STATUS_SHOW,
            TrackingStatus::Suppressed => STATUS_HIDE,
        }
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackingStatus::Enabled => write!(f, "enabled"),
            TrackingStatus::Suppressed => write!(f, "suppressed"),
        }
    }
}

/// Handle on a status record file.
#[derive(Debug, Clone)]
pub struct StatusRecord {
    path: PathBuf,
}

impl StatusRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn file_name(user: &str, project: &str) -> String {
        format!("{}_{}_status.csv", user, project)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Status from the last column of the first data row.
    ///
    /// Missing file, empty file or unknown value all mean enabled.
    pub fn read(&self) -> TrackingStatus {
        let Ok(file) = fs::File::open(&self.path) else {
            return TrackingStatus::default();
        };
        let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(file);
        reader
            .records()
            .next()
            .and_then(|record| record.ok())
            .and_then(|record| record.iter().last().and_then(TrackingStatus::from_cell))
            .unwrap_or_default()
    }

    /// Replaces the record with a single row carrying `status`.
    pub fn write(&self, user: &str, project: &str, status: TrackingStatus) -> TrackerResult<()> {
        let io_err = |source| TrackerError::StatusIo {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(io_err)?;
            }
        }

        let now = Local::now();
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(STATUS_HEADER)?;
        writer.write_record([
            user.to_string(),
            project.to_string(),
            now.format(DATE_FORMAT).to_string(),
            now.format(TIME_FORMAT_MICROS).to_string(),
            now.timestamp_micros().to_string(),
            status.as_cell().to_string(),
        ])?;
        writer.flush().map_err(io_err)?;
        Ok(())
    }
}
