//! vmgr CLI
//!
//! Command-line interface for the virtualization management API. Each
//! subcommand parses its flags, acquires a manager scoped to the selected
//! datastore or host, performs one operation, and prints the result.

pub mod commands;
pub mod config;
pub mod flags;
pub mod logging;
pub mod output;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::disk::{self, LS_EXAMPLES, LsArgs};
use crate::commands::host_account::{self, REMOVE_EXAMPLES, RemoveArgs};
use crate::config::{ClientConfig, ConfigError};
use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// Exit codes following Unix conventions
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "vmgr", version)]
#[command(about = "Virtualization platform management CLI", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true, env = "VMGR_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Management API base URL
    #[arg(long, global = true, env = "VMGR_URL")]
    pub url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "VMGR_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List disk IDs on DS
    #[command(name = "disk.ls", after_help = LS_EXAMPLES)]
    DiskLs(LsArgs),

    /// Remove local account on HOST
    #[command(name = "host.account.remove", after_help = REMOVE_EXAMPLES)]
    HostAccountRemove(RemoveArgs),
}

/// Parse arguments, run the selected command, and map failures to exit codes
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("vmgr: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn exit_code_for(err: &eyre::Report) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

async fn execute(cli: Cli) -> eyre::Result<()> {
    let config = ClientConfig::load(cli.config.as_deref(), cli.url.as_deref(), cli.timeout)?;
    let client = config.http_client()?;
    tracing::debug!(url = %client.base_url(), "connecting");

    match cli.command {
        Commands::DiskLs(args) => {
            let datastore = args.datastore.resolve(&config)?;
            let manager = client.vstorage_manager(datastore);
            let result = disk::ls(&manager, &args).await?;
            output::write_result(&result, cli.format, &mut io::stdout().lock())?;
        }
        Commands::HostAccountRemove(args) => {
            let manager = client.host_account_manager(args.account.host.resolve(&config));
            host_account::remove(&manager, &args.account.spec()).await?;
        }
    }

    Ok(())
}
