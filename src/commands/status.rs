use super::sum::resolve_project;
use crate::{
    libs::{
        data_storage::{current_user, DataStorage},
        messages::Message,
        status::{StatusRecord, TrackingStatus},
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusAction {
    /// Publish live totals while watching
    Show,
    /// Keep recording but publish nothing
    Hide,
}

impl From<StatusAction> for TrackingStatus {
    fn from(action: StatusAction) -> Self {
        match action {
            StatusAction::Show => TrackingStatus::Enabled,
            StatusAction::Hide => TrackingStatus::Suppressed,
        }
    }
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// New status; omit to print the current one
    #[arg(value_enum)]
    action: Option<StatusAction>,
    /// Project to act on instead of the configured one
    #[arg(short, long)]
    project: Option<String>,
}

pub fn cmd(status_args: StatusArgs) -> Result<()> {
    let project = resolve_project(status_args.project)?;
    let user = current_user();
    let record = StatusRecord::new(DataStorage::new().get_path(&StatusRecord::file_name(&user, &project))?);

    match status_args.action {
        Some(action) => {
            let status = TrackingStatus::from(action);
            record.write(&user, &project, status)?;
            msg_success!(Message::StatusSet {
                project,
                status: status.to_string(),
            });
        }
        None => {
            msg_info!(Message::StatusCurrent {
                project,
                status: record.read().to_string(),
            });
        }
    }

    Ok(())
}
