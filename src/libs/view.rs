use super::formatter::{activity_percentages, format_duration, format_hms};
use super::ledger::{HistoricalTotals, LedgerEntry};
use prettytable::{row, Table};
use std::time::Duration;

pub struct View {}

impl View {
    /// Prints one table row per recorded run, followed by the merged totals.
    pub fn ledger(entries: &[LedgerEntry], totals: &HistoricalTotals) -> anyhow::Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "DATE", "START", "END", "TOTAL", "ACTIVE", "BREAK", "SESSIONS"]);
        for (index, entry) in entries.iter().enumerate() {
            table.add_row(row![
                index + 1,
                entry.start_date,
                short_time(&entry.start_time),
                short_time(&entry.end_time),
                format_duration(&entry.total_time),
                format_duration(&entry.active_time),
                format_duration(&entry.break_time),
                entry.sessions
            ]);
        }

        let break_total: Duration = entries.iter().map(|e| e.break_time).sum();
        let sessions_total: u32 = entries.iter().map(|e| e.sessions).sum();
        let (pct_active, pct_idle) =
            activity_percentages(totals.total_project.as_millis() as i64, totals.total_active.as_millis() as i64);

        table.add_empty_row();
        table.add_row(row![
            "",
            "TOTAL",
            "",
            "",
            format_hms(totals.total_project.as_millis() as i64),
            format_hms(totals.total_active.as_millis() as i64),
            format_duration(&break_total),
            sessions_total
        ]);
        table.add_row(row!["", "ACTIVE / IDLE", "", "", "", format!("{:.1}%", pct_active), format!("{:.1}%", pct_idle), ""]);
        table.printstd();

        Ok(())
    }
}

/// `HH:MM:SS.ffffff` trimmed to `HH:MM:SS`.
fn short_time(time: &str) -> &str {
    time.split('.').next().unwrap_or(time)
}
