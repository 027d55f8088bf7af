use crate::{
    libs::{
        config::{Config, TrackerConfig},
        data_storage::{current_user, DataStorage},
        ledger::Ledger,
        messages::Message,
        view::View,
    },
    msg_error_anyhow, msg_info, msg_print, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SumArgs {
    /// Project to summarize instead of the configured one
    #[arg(short, long)]
    project: Option<String>,
}

pub fn cmd(sum_args: SumArgs) -> Result<()> {
    let project = resolve_project(sum_args.project)?;
    let user = current_user();
    let ledger = Ledger::new(DataStorage::new().get_path(&Ledger::file_name(&user, &project))?);

    let entries = ledger.entries()?;
    if entries.is_empty() {
        msg_info!(Message::LedgerEmpty(project));
        return Ok(());
    }

    msg_print!(Message::LedgerHeader(project), true);
    View::ledger(&entries, &ledger.historical_totals())?;
    msg_print!(Message::LedgerPath(ledger.path().display().to_string()));

    Ok(())
}

/// Tracker settings from the config file, or defaults if it cannot be read.
fn configured_tracker() -> TrackerConfig {
    match Config::read() {
        Ok(config) => config.tracker.unwrap_or_default(),
        Err(e) => {
            msg_warning!(Message::ConfigReadFailed(e.to_string()));
            TrackerConfig::default()
        }
    }
}

/// The `--project` override, or the configured project when absent.
pub fn resolve_project(project: Option<String>) -> Result<String> {
    match project {
        Some(name) if name.trim().is_empty() => Err(msg_error_anyhow!(Message::ProjectNameEmpty)),
        Some(name) => Ok(name.trim().to_string()),
        None => Ok(configured_tracker().project_name()),
    }
}
