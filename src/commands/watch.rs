use crate::libs::daemon;
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    daemon::run_with_signal_handling().await
}
