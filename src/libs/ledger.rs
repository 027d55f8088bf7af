//! Append-only CSV ledger of tracked runs and the historical totals merged
//! from it at start-up.
//!
//! One row is written per process lifetime (or per run cut short by a
//! conflict). The header is written exactly once, when the file is created.
//!
//! ## Format
//!
//! ```text
//! Username,Project,Start Date,Start Time,Start Epoch (us),End Date,End Time,End Epoch (us),
//! Total Time (sec),Active Time (sec),Break Time (sec),Total Mini Sessions,
//! Avg Mini Session (sec),Avg Break (sec),Max Mini Session (sec),Min Mini Session (sec),
//! Max Break (sec),Min Break (sec)
//! ```
//!
//! Dates are `YYYY-MM-DD`, times `HH:MM:SS.ffffff` in local time, epochs in
//! microseconds and every `(sec)` column a two-decimal fixed-point number
//! rounded half-up.
//!
//! ## Tolerance
//!
//! Reading never fails the caller: a missing file, an unknown header, a
//! malformed row or an unparseable cell simply contributes zero.

use super::error::{TrackerError, TrackerResult};
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const LEDGER_HEADER: [&str; 18] = [
    "Username",
    "Project",
    "Start Date",
    "Start Time",
    "Start Epoch (us)",
    "End Date",
    "End Time",
    "End Epoch (us)",
    "Total Time (sec)",
    "Active Time (sec)",
    "Break Time (sec)",
    "Total Mini Sessions",
    "Avg Mini Session (sec)",
    "Avg Break (sec)",
    "Max Mini Session (sec)",
    "Min Mini Session (sec)",
    "Max Break (sec)",
    "Min Break (sec)",
];

/// Header names accepted for the total-time column.
pub const TOTAL_TIME_COLUMNS: &[&str] = &["Total Time (sec)"];
/// Header names accepted for the active-time column, newest first.
pub const ACTIVE_TIME_COLUMNS: &[&str] = &["Active Time (sec)", "Total Active Time (sec)"];
const BREAK_TIME_COLUMNS: &[&str] = &["Break Time (sec)"];
const SESSIONS_COLUMNS: &[&str] = &["Total Mini Sessions"];
const START_COLUMNS: &[&str] = &["Start Date"];
const START_TIME_COLUMNS: &[&str] = &["Start Time"];
const END_TIME_COLUMNS: &[&str] = &["End Time"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT_MICROS: &str = "%H:%M:%S%.6f";

/// Totals recovered from all prior ledger rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoricalTotals {
    pub total_project: Duration,
    pub total_active: Duration,
}

/// One completed run, ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub user: String,
    pub project: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub total_time: Duration,
    pub active_time: Duration,
    pub break_time: Duration,
    pub sessions: u32,
    pub avg_session: Duration,
    pub avg_break: Duration,
    pub max_session: Duration,
    pub min_session: Duration,
    pub max_break: Duration,
    pub min_break: Duration,
}

impl LedgerRow {
    /// Cells in [`LEDGER_HEADER`] order.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.user.clone(),
            self.project.clone(),
            self.start.format(DATE_FORMAT).to_string(),
            self.start.format(TIME_FORMAT_MICROS).to_string(),
            self.start.timestamp_micros().to_string(),
            self.end.format(DATE_FORMAT).to_string(),
            self.end.format(TIME_FORMAT_MICROS).to_string(),
            self.end.timestamp_micros().to_string(),
            seconds_fixed2(self.total_time),
            seconds_fixed2(self.active_time),
            seconds_fixed2(self.break_time),
            self.sessions.to_string(),
            seconds_fixed2(self.avg_session),
            seconds_fixed2(self.avg_break),
            seconds_fixed2(self.max_session),
            seconds_fixed2(self.min_session),
            seconds_fixed2(self.max_break),
            seconds_fixed2(self.min_break),
        ]
    }
}

/// A past run as read back for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub start_date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_time: Duration,
    pub active_time: Duration,
    pub break_time: Duration,
    pub sessions: u32,
}

/// Formats a duration as seconds with two decimals, rounding half-up.
pub fn seconds_fixed2(duration: Duration) -> String {
    let micros = duration.as_micros();
    let hundredths = (micros + 5_000) / 10_000;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// Parses a seconds cell into microseconds; anything unparseable is zero.
fn parse_seconds_micros(cell: &str) -> i64 {
    let cell = cell.trim().trim_matches('"');
    match cell.parse::<f64>() {
        Ok(secs) if secs.is_finite() => (secs * 1_000_000.0).round() as i64,
        _ => 0,
    }
}

fn micros_to_duration(micros: i64) -> Duration {
    Duration::from_micros(u64::try_from(micros).unwrap_or(0))
}

/// Index of the first candidate present in the header, case-insensitive.
fn column_index(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    candidates
        .iter()
        .map(|c| c.to_lowercase())
        .find_map(|c| normalized.iter().position(|h| *h == c))
}

/// Handle on one ledger file.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger file name for a user and project.
    pub fn file_name(user: &str, project: &str) -> String {
        format!("{}_{}_idle_stats.csv", user, project)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&self) -> TrackerResult<Option<csv::Reader<fs::File>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&self.path).map_err(|source| TrackerError::LedgerIo {
            path: self.path.clone(),
            source,
        })?;
        let reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).trim(csv::Trim::All).from_reader(file);
        Ok(Some(reader))
    }

    /// Sums the first matching column over every row, in microseconds.
    ///
    /// Rows that fail to parse are skipped.
    pub fn sum_column_micros(&self, candidates: &[&str]) -> TrackerResult<i64> {
        let Some(mut reader) = self.reader()? else {
            return Ok(0);
        };
        let headers = reader.headers()?.clone();
        let Some(idx) = column_index(&headers, candidates) else {
            return Ok(0);
        };

        let mut sum: i64 = 0;
        for record in reader.records() {
            let Ok(record) = record else { continue };
            if let Some(cell) = record.get(idx) {
                sum = sum.saturating_add(parse_seconds_micros(cell));
            }
        }
        Ok(sum)
    }

    /// Historical project and active totals. Never fails.
    pub fn historical_totals(&self) -> HistoricalTotals {
        let sum = |candidates: &[&str]| match self.sum_column_micros(candidates) {
            Ok(micros) => micros_to_duration(micros),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "ignoring unreadable ledger");
                Duration::ZERO
            }
        };
        HistoricalTotals {
            total_project: sum(TOTAL_TIME_COLUMNS),
            total_active: sum(ACTIVE_TIME_COLUMNS),
        }
    }

    /// Reads every parseable row for display.
    pub fn entries(&self) -> TrackerResult<Vec<LedgerEntry>> {
        let Some(mut reader) = self.reader()? else {
            return Ok(Vec::new());
        };
        let headers = reader.headers()?.clone();
        let idx = |candidates: &[&str]| column_index(&headers, candidates);
        let (start, start_time, end_time) = (idx(START_COLUMNS), idx(START_TIME_COLUMNS), idx(END_TIME_COLUMNS));
        let (total, active, brk, sessions) = (
            idx(TOTAL_TIME_COLUMNS),
            idx(ACTIVE_TIME_COLUMNS),
            idx(BREAK_TIME_COLUMNS),
            idx(SESSIONS_COLUMNS),
        );

        let mut entries = Vec::new();
        for record in reader.records() {
            let Ok(record) = record else { continue };
            let text = |i: Option<usize>| i.and_then(|i| record.get(i)).unwrap_or("").to_string();
            let secs = |i: Option<usize>| micros_to_duration(i.and_then(|i| record.get(i)).map_or(0, parse_seconds_micros));
            entries.push(LedgerEntry {
                start_date: text(start),
                start_time: text(start_time),
                end_time: text(end_time),
                total_time: secs(total),
                active_time: secs(active),
                break_time: secs(brk),
                sessions: sessions.and_then(|i| record.get(i)).and_then(|s| s.parse().ok()).unwrap_or(0),
            });
        }
        Ok(entries)
    }

    /// Appends one row, writing the header first if the file is new or empty.
    pub fn append(&self, row: &LedgerRow) -> TrackerResult<()> {
        let io_err = |source| TrackerError::LedgerIo {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(io_err)?;
            }
        }
        let write_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(&self.path).map_err(io_err)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if write_header {
            writer.write_record(LEDGER_HEADER)?;
        }
        writer.write_record(row.to_record())?;
        writer.flush().map_err(io_err)?;
        Ok(())
    }
}
