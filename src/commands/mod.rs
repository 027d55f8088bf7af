//! Command-line interface.
//!
//! | Command  | Purpose                                              |
//! |----------|------------------------------------------------------|
//! | `watch`  | Track activity in the foreground until interrupted   |
//! | `sum`    | Show the recorded ledger with merged totals          |
//! | `status` | Show or change the per-project status display switch |
//! | `init`   | Interactive configuration                            |

pub mod init;
pub mod status;
pub mod sum;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Track keyboard and mouse activity for the configured project")]
    Watch,
    #[command(about = "Show recorded sessions and totals")]
    Sum(sum::SumArgs),
    #[command(about = "Show or change whether live status is displayed")]
    Status(status::StatusArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch => watch::cmd().await,
            Commands::Sum(args) => sum::cmd(args),
            Commands::Status(args) => status::cmd(args),
        }
    }
}
