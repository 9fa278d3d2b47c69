use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::traffic::ResetScope;

#[derive(Parser, Debug)]
#[command(name = "netmeter")]
#[command(author, version, about = "Wi-Fi and cellular traffic meter", long_about = None)]
pub struct CliArgs {
    /// Path to the rc file (default: <config dir>/netmeter/netmeterrc)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the traffic ledger location
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Override the sampling interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive terminal view (default)
    Tui,
    /// Sample in the foreground and log every snapshot until Ctrl+C
    Watch,
    /// Print today's and this month's usage
    Stats,
    /// Reset the stored traffic for today or this month
    Reset {
        #[arg(value_enum)]
        scope: ResetArg,
    },
    /// Drop daily records older than the retention window
    Cleanup,
    /// Write the default rc file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetArg {
    Today,
    Month,
}

impl From<ResetArg> for ResetScope {
    fn from(arg: ResetArg) -> Self {
        match arg {
            ResetArg::Today => ResetScope::Today,
            ResetArg::Month => ResetScope::Month,
        }
    }
}
