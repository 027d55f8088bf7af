use crate::{
    libs::{
        config::{Config, CONFIG_FILE_NAME},
        data_storage::DataStorage,
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Print the configuration file location and exit
    #[arg(short, long)]
    path: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.path {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        msg_info!(Message::ConfigPath(path.display().to_string()));
        return Ok(());
    }

    Config::init()?.save()?;

    msg_success!(Message::ConfigSaved);
    Ok(())
}
